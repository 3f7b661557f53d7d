// SPDX-License-Identifier: GPL-3.0-only
//! Diagnostic sinks
//!
//! The gate never talks to a logger directly. It is handed a [`LogSink`] and
//! writes one line per noteworthy outcome. Inside a PAM stack that sink is the
//! system authentication log; the probe CLI forwards into `tracing` instead.

use std::ffi::CString;

/// Prefix carried by every line written to syslog
pub const SYSLOG_TAG: &str = "pam_monitor";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Debug,
}

impl Severity {
    fn syslog_priority(self) -> libc::c_int {
        match self {
            Severity::Error => libc::LOG_ERR,
            Severity::Warning => libc::LOG_WARNING,
            Severity::Info => libc::LOG_INFO,
            Severity::Debug => libc::LOG_DEBUG,
        }
    }
}

/// Destination for operator-facing diagnostics
pub trait LogSink {
    fn log(&self, severity: Severity, message: &str);

    fn error(&self, message: &str) {
        self.log(Severity::Error, message);
    }

    fn warn(&self, message: &str) {
        self.log(Severity::Warning, message);
    }

    fn info(&self, message: &str) {
        self.log(Severity::Info, message);
    }
}

impl<S: LogSink + ?Sized> LogSink for &S {
    fn log(&self, severity: Severity, message: &str) {
        (**self).log(severity, message);
    }
}

/// Writes to the host's syslog under the `LOG_AUTHPRIV` facility
///
/// `openlog` is never called; the ident belongs to the host process, so
/// lines are tagged with [`SYSLOG_TAG`] instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct Syslog;

impl LogSink for Syslog {
    fn log(&self, severity: Severity, message: &str) {
        let line = format_line(message);

        // The message is passed as an argument, never as the format string.
        unsafe {
            libc::syslog(
                libc::LOG_AUTHPRIV | severity.syslog_priority(),
                c"%s".as_ptr(),
                line.as_ptr(),
            );
        }
    }
}

/// Tag `message` and make it safe to hand to C
///
/// Interior NUL bytes are escaped as `\0`; anything else, `%` included, is
/// kept verbatim.
fn format_line(message: &str) -> CString {
    let line = format!("{SYSLOG_TAG}: {message}").replace('\0', "\\0");
    CString::new(line).unwrap_or_default()
}

/// Forwards diagnostics to the current `tracing` subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Error => error!("{message}"),
            Severity::Warning => warn!("{message}"),
            Severity::Info => info!("{message}"),
            Severity::Debug => debug!("{message}"),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingSink;
    use super::*;

    #[test]
    fn test_helpers_tag_severity() {
        let sink = RecordingSink::default();
        sink.error("boom");
        sink.warn("careful");
        sink.info("fyi");

        assert_eq!(sink.count(Severity::Error), 1);
        assert_eq!(sink.count(Severity::Warning), 1);
        assert!(sink.contains(Severity::Info, "fyi"));
    }

    #[test]
    fn test_reference_forwards() {
        let sink = RecordingSink::default();
        let by_ref: &dyn LogSink = &sink;
        (&by_ref).error("through a reference");
        assert!(sink.contains(Severity::Error, "through a reference"));
    }

    #[test]
    fn test_format_line_tagged() {
        let line = format_line("No monitor_uuid argument provided");
        assert_eq!(line.to_str().unwrap(), "pam_monitor: No monitor_uuid argument provided");
    }

    #[test]
    fn test_format_line_escapes_nul() {
        let line = format_line("bad\0id");
        assert_eq!(line.to_str().unwrap(), "pam_monitor: bad\\0id");
    }

    #[test]
    fn test_format_line_keeps_percent() {
        let line = format_line("monitor_uuid=%s%n");
        assert_eq!(line.to_str().unwrap(), "pam_monitor: monitor_uuid=%s%n");
    }

    #[test]
    fn test_syslog_priorities() {
        assert_eq!(Severity::Error.syslog_priority(), libc::LOG_ERR);
        assert_eq!(Severity::Debug.syslog_priority(), libc::LOG_DEBUG);
    }
}
