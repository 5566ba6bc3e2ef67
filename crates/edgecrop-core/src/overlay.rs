//! Percentage insets for drawing the crop guide over a scaled image.
//!
//! The guide is positioned relative to the displayed image, whose on-screen
//! size may differ from its pixel size, so each edge is expressed as a
//! percentage of its axis. The mapping is display-only and never feeds back
//! into the edge offsets.

use serde::{Deserialize, Serialize};

use crate::edges::{Edge, EdgeOffsets};
use crate::geometry::ImageDimensions;

/// Guide rectangle insets, each in percent of the matching axis (0 to 100).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlayInsets {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl OverlayInsets {
    /// All-zero insets, drawn as a guide hugging the full image.
    pub const INERT: OverlayInsets = OverlayInsets {
        left: 0.0,
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
    };

    pub fn get(&self, edge: Edge) -> f64 {
        match edge {
            Edge::Left => self.left,
            Edge::Right => self.right,
            Edge::Top => self.top,
            Edge::Bottom => self.bottom,
        }
    }

    /// CSS values in `left, top, right, bottom` order, e.g. `"12.5%"`.
    pub fn css_percentages(&self) -> [String; 4] {
        [self.left, self.top, self.right, self.bottom].map(|value| format!("{value}%"))
    }
}

/// Map edge offsets to guide insets.
///
/// `dims` is `None` until the source has been probed. Unknown dimensions and
/// zero-length axes give zero percentages instead of dividing by zero.
pub fn overlay_insets(edges: &EdgeOffsets, dims: Option<ImageDimensions>) -> OverlayInsets {
    let Some(dims) = dims else {
        return OverlayInsets::INERT;
    };

    let percent = |edge: Edge| -> f64 {
        let axis_size = dims.along(edge.axis());
        if axis_size == 0 {
            return 0.0;
        }
        f64::from(edges.get(edge)) / f64::from(axis_size) * 100.0
    };

    OverlayInsets {
        left: percent(Edge::Left),
        top: percent(Edge::Top),
        right: percent(Edge::Right),
        bottom: percent(Edge::Bottom),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: insets for valid offsets are finite and within 0..100.
        #[test]
        fn prop_insets_bounded(
            width in 0u32..=4000,
            height in 0u32..=4000,
            left in 0u32..=4000,
            right in 0u32..=4000,
            top in 0u32..=4000,
            bottom in 0u32..=4000,
        ) {
            let dims = ImageDimensions::new(width, height);
            let edges = EdgeOffsets { left, right, top, bottom };
            let insets = overlay_insets(&edges, Some(dims));

            for edge in Edge::ALL {
                let value = insets.get(edge);
                prop_assert!(value.is_finite());
                prop_assert!(value >= 0.0);
                if edges.is_valid_for(dims) {
                    prop_assert!(value < 100.0);
                }
            }
        }
    }
}
