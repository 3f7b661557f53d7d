// SPDX-License-Identifier: GPL-3.0-only
//! Module arguments from the PAM configuration line
//!
//! ```text
//! auth  sufficient  pam_monitor.so  monitor_uuid=10AC5A41-0000-0000-1E1D-0104B53C2278 debug
//! ```

/// Key naming the display that has to be present
pub const MONITOR_UUID_KEY: &str = "monitor_uuid";

/// Flag enabling informational diagnostics
pub const DEBUG_FLAG: &str = "debug";

/// Parsed module arguments
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Options {
    /// Identifier of the required display; `None` if not configured
    pub monitor_uuid: Option<String>,
    pub debug: bool,
    /// Entries that were not understood, kept for diagnostics
    pub unknown: Vec<String>,
}

impl Options {
    /// Parse an argument vector of `key=value` and bare flag entries
    ///
    /// The first `monitor_uuid=` wins; an empty value counts as missing.
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Options::default();

        for arg in args {
            let arg = arg.as_ref();
            match arg.split_once('=') {
                Some((MONITOR_UUID_KEY, value)) => {
                    let value = value.trim();
                    if options.monitor_uuid.is_none() && !value.is_empty() {
                        options.monitor_uuid = Some(value.to_string());
                    }
                }
                None if arg == DEBUG_FLAG => options.debug = true,
                _ => options.unknown.push(arg.to_string()),
            }
        }

        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_uuid() {
        let options = Options::parse(["monitor_uuid=ABCD-1234"]);
        assert_eq!(options.monitor_uuid.as_deref(), Some("ABCD-1234"));
        assert!(!options.debug);
        assert!(options.unknown.is_empty());
    }

    #[test]
    fn test_missing_monitor_uuid() {
        let options = Options::parse(["debug"]);
        assert_eq!(options.monitor_uuid, None);
        assert!(options.debug);
    }

    #[test]
    fn test_empty_value_is_missing() {
        let options = Options::parse(["monitor_uuid=", "monitor_uuid=  "]);
        assert_eq!(options.monitor_uuid, None);
    }

    #[test]
    fn test_target_trimmed() {
        let options = Options::parse(["monitor_uuid= ABCD-1234 "]);
        assert_eq!(options.monitor_uuid.as_deref(), Some("ABCD-1234"));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let options = Options::parse(["monitor_uuid=first", "monitor_uuid=second"]);
        assert_eq!(options.monitor_uuid.as_deref(), Some("first"));
    }

    #[test]
    fn test_unknown_entries_kept() {
        let options = Options::parse(["monitor=oops", "monitor_uuid=ABCD", "verbose"]);
        assert_eq!(options.monitor_uuid.as_deref(), Some("ABCD"));
        assert_eq!(options.unknown, vec!["monitor=oops".to_string(), "verbose".to_string()]);
    }

    #[test]
    fn test_value_may_contain_equals() {
        let options = Options::parse(["monitor_uuid=a=b"]);
        assert_eq!(options.monitor_uuid.as_deref(), Some("a=b"));
    }
}
