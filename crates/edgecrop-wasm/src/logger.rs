//! Routes the `log` facade to the browser console.

use std::str::FromStr;

use log::LevelFilter;

/// Install the console logger at `filter`. Later calls only move the level.
pub(crate) fn install(filter: LevelFilter) {
    if let Some(level) = filter.to_level() {
        // fails once a logger is set, which leaves that logger in place
        let _ = console_log::init_with_level(level);
    }
    log::set_max_level(filter);
}

/// Parse a level name such as `"debug"`; unknown names fall back to `Warn`.
pub(crate) fn parse_level(name: &str) -> LevelFilter {
    LevelFilter::from_str(name.trim()).unwrap_or(LevelFilter::Warn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level(" TRACE "), LevelFilter::Trace);
        assert_eq!(parse_level("off"), LevelFilter::Off);
        assert_eq!(parse_level("chatty"), LevelFilter::Warn);
    }
}
