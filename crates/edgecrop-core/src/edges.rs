//! Edge offsets and the constraint rule that keeps them valid.
//!
//! Each of the four edges is an independent inward offset in source pixels.
//! An edit to one edge is accepted only when the pair on that axis still
//! leaves at least one pixel of span:
//!
//! - `left < width - right`
//! - `right < width - left`
//! - `top < height - bottom`
//! - `bottom < height - top`
//!
//! A violating edit is rejected in full. It is never clamped to the nearest
//! legal value, so the crop always matches what the user asked for or stays
//! where it was.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::ImageDimensions;

/// Image axis an edge moves along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// One side of the crop rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    /// All edges in slider display order.
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

    /// The edge sharing this edge's axis.
    pub fn opposite(self) -> Edge {
        match self {
            Edge::Left => Edge::Right,
            Edge::Right => Edge::Left,
            Edge::Top => Edge::Bottom,
            Edge::Bottom => Edge::Top,
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Edge::Left | Edge::Right => Axis::Horizontal,
            Edge::Top | Edge::Bottom => Axis::Vertical,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Edge::Left => "left",
            Edge::Right => "right",
            Edge::Top => "top",
            Edge::Bottom => "bottom",
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an edge name is not one of the four sides.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown edge: {0:?} (expected left, right, top or bottom)")]
pub struct ParseEdgeError(pub String);

impl FromStr for Edge {
    type Err = ParseEdgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Edge::Left),
            "right" => Ok(Edge::Right),
            "top" => Ok(Edge::Top),
            "bottom" => Ok(Edge::Bottom),
            _ => Err(ParseEdgeError(s.to_string())),
        }
    }
}

/// An edge edit that would collapse or invert the crop rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Rejected {edge} edge at {value}: must stay below {limit}")]
pub struct EdgeRejection {
    /// Edge that was being edited.
    pub edge: Edge,
    /// Proposed value.
    pub value: u32,
    /// Exclusive upper bound the value had to stay under.
    pub limit: u32,
}

/// Inward offsets of the four crop edges, in source pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeOffsets {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl EdgeOffsets {
    /// No trimming: the crop covers the whole image.
    pub const ZERO: EdgeOffsets = EdgeOffsets {
        left: 0,
        right: 0,
        top: 0,
        bottom: 0,
    };

    pub fn get(&self, edge: Edge) -> u32 {
        match edge {
            Edge::Left => self.left,
            Edge::Right => self.right,
            Edge::Top => self.top,
            Edge::Bottom => self.bottom,
        }
    }

    fn slot(&mut self, edge: Edge) -> &mut u32 {
        match edge {
            Edge::Left => &mut self.left,
            Edge::Right => &mut self.right,
            Edge::Top => &mut self.top,
            Edge::Bottom => &mut self.bottom,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Propose a new value for one edge.
    ///
    /// Returns the updated offsets, or an [`EdgeRejection`] leaving `self`
    /// untouched when `value >= axis_size - opposite_edge`.
    pub fn with_edge(
        self,
        edge: Edge,
        value: u32,
        dims: ImageDimensions,
    ) -> Result<EdgeOffsets, EdgeRejection> {
        let limit = edge_limit(&self, edge, dims);
        if value >= limit {
            return Err(EdgeRejection { edge, value, limit });
        }

        let mut next = self;
        *next.slot(edge) = value;
        Ok(next)
    }

    /// Check the span invariant on both axes.
    pub fn is_valid_for(&self, dims: ImageDimensions) -> bool {
        u64::from(self.left) + u64::from(self.right) < u64::from(dims.width)
            && u64::from(self.top) + u64::from(self.bottom) < u64::from(dims.height)
    }
}

/// Exclusive upper bound for `edge` given the current opposite edge.
fn edge_limit(edges: &EdgeOffsets, edge: Edge, dims: ImageDimensions) -> u32 {
    dims.along(edge.axis())
        .saturating_sub(edges.get(edge.opposite()))
}

/// Input range a UI control for `edge` should offer.
///
/// This is `[0, axis_size - opposite_edge - margin]`, keeping a visible strip of
/// `margin` pixels. A margin of 0 still keeps one pixel, since the limit itself
/// is never accepted. It collapses to `0..=0` on images too small for the margin.
pub fn slider_range(
    edges: &EdgeOffsets,
    edge: Edge,
    dims: ImageDimensions,
    margin: u32,
) -> RangeInclusive<u32> {
    let max = edge_limit(edges, edge, dims).saturating_sub(margin.max(1));
    0..=max
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIMS: ImageDimensions = ImageDimensions {
        width: 800,
        height: 600,
    };

    #[test]
    fn test_accepts_edit_inside_span() {
        let edges = EdgeOffsets::ZERO
            .with_edge(Edge::Left, 100, DIMS)
            .and_then(|e| e.with_edge(Edge::Right, 100, DIMS))
            .and_then(|e| e.with_edge(Edge::Top, 50, DIMS))
            .and_then(|e| e.with_edge(Edge::Bottom, 50, DIMS))
            .unwrap();

        assert_eq!(
            edges,
            EdgeOffsets {
                left: 100,
                right: 100,
                top: 50,
                bottom: 50
            }
        );
    }

    #[test]
    fn test_rejects_left_past_right() {
        let edges = EdgeOffsets {
            right: 100,
            ..EdgeOffsets::ZERO
        };
        let err = edges.with_edge(Edge::Left, 750, DIMS).unwrap_err();

        assert_eq!(err.edge, Edge::Left);
        assert_eq!(err.value, 750);
        assert_eq!(err.limit, 700);
        // Boundary itself is rejected, one below is accepted
        assert!(edges.with_edge(Edge::Left, 700, DIMS).is_err());
        assert!(edges.with_edge(Edge::Left, 699, DIMS).is_ok());
    }

    #[test]
    fn test_rejection_is_not_a_clamp() {
        let edges = EdgeOffsets {
            top: 10,
            bottom: 500,
            ..EdgeOffsets::ZERO
        };
        assert!(edges.with_edge(Edge::Top, 100, DIMS).is_err());
        // Caller still holds the old value
        assert_eq!(edges.top, 10);
    }

    #[test]
    fn test_each_edge_checks_its_opposite() {
        let edges = EdgeOffsets {
            left: 300,
            right: 300,
            top: 200,
            bottom: 200,
        };
        assert!(edges.with_edge(Edge::Left, 500, DIMS).is_err());
        assert!(edges.with_edge(Edge::Right, 500, DIMS).is_err());
        assert!(edges.with_edge(Edge::Top, 400, DIMS).is_err());
        assert!(edges.with_edge(Edge::Bottom, 400, DIMS).is_err());

        assert!(edges.with_edge(Edge::Left, 499, DIMS).is_ok());
        assert!(edges.with_edge(Edge::Bottom, 399, DIMS).is_ok());
    }

    #[test]
    fn test_minimum_viable_image() {
        let dims = ImageDimensions::new(10, 10);
        let edges = EdgeOffsets::ZERO.with_edge(Edge::Left, 9, dims).unwrap();
        assert_eq!(edges.left, 9);
        assert!(edges.is_valid_for(dims));
        assert!(EdgeOffsets::ZERO.with_edge(Edge::Left, 10, dims).is_err());
    }

    #[test]
    fn test_zero_sized_axis_rejects_everything() {
        let dims = ImageDimensions::new(0, 0);
        assert!(EdgeOffsets::ZERO.with_edge(Edge::Left, 0, dims).is_err());
    }

    #[test]
    fn test_slider_range_keeps_margin() {
        let edges = EdgeOffsets {
            right: 100,
            top: 40,
            ..EdgeOffsets::ZERO
        };
        assert_eq!(slider_range(&edges, Edge::Left, DIMS, 10), 0..=690);
        assert_eq!(slider_range(&edges, Edge::Right, DIMS, 10), 0..=790);
        assert_eq!(slider_range(&edges, Edge::Bottom, DIMS, 10), 0..=550);
    }

    #[test]
    fn test_slider_range_without_margin() {
        let edges = EdgeOffsets {
            right: 100,
            ..EdgeOffsets::ZERO
        };
        let range = slider_range(&edges, Edge::Left, DIMS, 0);
        assert_eq!(range, 0..=699);
        assert!(edges.with_edge(Edge::Left, *range.end(), DIMS).is_ok());
        assert!(edges.with_edge(Edge::Left, range.end() + 1, DIMS).is_err());

        let single = ImageDimensions::new(1, 1);
        assert_eq!(slider_range(&EdgeOffsets::ZERO, Edge::Top, single, 0), 0..=0);
    }

    #[test]
    fn test_slider_range_on_tiny_image() {
        let dims = ImageDimensions::new(8, 8);
        assert_eq!(slider_range(&EdgeOffsets::ZERO, Edge::Top, dims, 10), 0..=0);
    }

    #[test]
    fn test_edge_parsing() {
        assert_eq!("left".parse::<Edge>(), Ok(Edge::Left));
        assert_eq!(" Bottom ".parse::<Edge>(), Ok(Edge::Bottom));
        assert_eq!(
            "middle".parse::<Edge>(),
            Err(ParseEdgeError("middle".to_string()))
        );
        for edge in Edge::ALL {
            assert_eq!(edge.as_str().parse::<Edge>(), Ok(edge));
            assert_eq!(edge.opposite().opposite(), edge);
            assert_eq!(edge.opposite().axis(), edge.axis());
        }
    }

    #[test]
    fn test_rejection_display() {
        let err = EdgeRejection {
            edge: Edge::Left,
            value: 750,
            limit: 700,
        };
        assert_eq!(err.to_string(), "Rejected left edge at 750: must stay below 700");
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
