// SPDX-License-Identifier: GPL-3.0-only
//! Decision gate
//!
//! Turns the module arguments and the current display set into a verdict.
//! Configuration is checked before any device I/O, and every failure of the
//! device query ends in a denial.

use crate::error::{GateError, Result};
use crate::matcher::{self, ScanReport};
use crate::options::Options;
use crate::registry::{DISPLAY_CLASS, DeviceClass, DeviceRegistry};
use crate::sink::LogSink;

/// Result of one authentication attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The required display is attached
    Granted,
    /// It is not, or the registry could not be queried
    Denied,
    /// No target identifier was configured
    Misconfigured,
}

/// Presence check bound to a registry and a diagnostics sink
#[derive(Debug)]
pub struct Gate<R, S> {
    registry: R,
    sink: S,
    class: DeviceClass,
}

impl<R: DeviceRegistry, S: LogSink> Gate<R, S> {
    pub fn new(registry: R, sink: S) -> Self {
        Self {
            registry,
            sink,
            class: DISPLAY_CLASS,
        }
    }

    /// Query a different device class than the platform's display class
    #[cfg(test)]
    pub(crate) fn with_class(mut self, class: DeviceClass) -> Self {
        self.class = class;
        self
    }

    /// Parse `args` and decide
    pub fn authenticate<I, A>(&self, args: I) -> Verdict
    where
        I: IntoIterator<Item = A>,
        A: AsRef<str>,
    {
        self.decide(&Options::parse(args))
    }

    pub fn decide(&self, options: &Options) -> Verdict {
        for arg in &options.unknown {
            self.sink.warn(&format!("Ignoring unknown option: {arg}"));
        }

        let Some(target) = options.monitor_uuid.as_deref() else {
            self.sink.error(&GateError::MissingTarget.to_string());
            return Verdict::Misconfigured;
        };

        match self.check(target) {
            Ok(report) if report.is_match() => {
                if options.debug {
                    self.sink.info(&format!(
                        "Monitor {} present ({}), access granted",
                        target,
                        report.matched.as_deref().unwrap_or_default()
                    ));
                }
                Verdict::Granted
            }
            Ok(report) => {
                if options.debug {
                    for (device, property) in &report.skipped {
                        self.sink
                            .info(&format!("Display {device} has no usable identifier: {property:?}"));
                    }
                    self.sink.info(&format!(
                        "Monitor {} not found among {} display(s), access denied",
                        target, report.inspected
                    ));
                }
                Verdict::Denied
            }
            Err(e) => {
                self.sink.error(&format!("{e}, access denied"));
                Verdict::Denied
            }
        }
    }

    /// Enumerate once and scan for `target`
    pub fn check(&self, target: &str) -> Result<ScanReport> {
        let devices = self.registry.enumerate(self.class)?;
        Ok(matcher::scan(devices, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Property;
    use crate::registry::testing::FakeRegistry;
    use crate::sink::Severity;
    use crate::sink::testing::RecordingSink;

    #[test]
    fn test_granted_when_present() {
        let registry = FakeRegistry::with_ids(&["1111", "ABCD-1234"]);
        let sink = RecordingSink::default();
        let gate = Gate::new(&registry, &sink);

        assert_eq!(gate.authenticate(["monitor_uuid=ABCD-1234"]), Verdict::Granted);
        assert!(sink.lines.borrow().is_empty());
    }

    #[test]
    fn test_denied_when_absent() {
        let registry = FakeRegistry::with_ids(&["1111", "2222"]);
        let sink = RecordingSink::default();
        let gate = Gate::new(&registry, &sink);

        assert_eq!(gate.authenticate(["monitor_uuid=ABCD-1234"]), Verdict::Denied);
        assert_eq!(sink.count(Severity::Error), 0);
    }

    #[test]
    fn test_case_variation() {
        let registry = FakeRegistry::with_ids(&["abcd-1234"]);
        let sink = RecordingSink::default();
        let gate = Gate::new(&registry, &sink);

        assert_eq!(gate.authenticate(["monitor_uuid=ABCD-1234"]), Verdict::Granted);
    }

    #[test]
    fn test_missing_target_skips_enumeration() {
        let registry = FakeRegistry::with_ids(&["ABCD-1234"]);
        let sink = RecordingSink::default();
        let gate = Gate::new(&registry, &sink);

        assert_eq!(gate.authenticate(["debug"]), Verdict::Misconfigured);
        assert_eq!(registry.counters.enumerations.get(), 0);
        assert_eq!(registry.counters.acquired.get(), 0);
        assert!(sink.contains(Severity::Error, "No monitor_uuid argument provided"));
    }

    #[test]
    fn test_no_arguments() {
        let registry = FakeRegistry::with_ids(&["ABCD-1234"]);
        let sink = RecordingSink::default();
        let gate = Gate::new(&registry, &sink);

        assert_eq!(gate.authenticate(Vec::<String>::new()), Verdict::Misconfigured);
        assert_eq!(registry.counters.enumerations.get(), 0);
    }

    #[test]
    fn test_enumeration_failure_fails_closed() {
        // The failing registry would report a matching device if asked.
        let registry = FakeRegistry::failing();
        let sink = RecordingSink::default();
        let gate = Gate::new(&registry, &sink);

        assert_eq!(gate.authenticate(["monitor_uuid=ABCD-1234"]), Verdict::Denied);
        assert_eq!(registry.counters.enumerations.get(), 1);
        assert_eq!(registry.counters.acquired.get(), 0);
        assert!(sink.contains(Severity::Error, "failed to enumerate"));
    }

    #[test]
    fn test_failure_distinguished_from_absence() {
        let sink = RecordingSink::default();

        let absent = FakeRegistry::with_ids(&[]);
        Gate::new(&absent, &sink).authenticate(["monitor_uuid=ABCD-1234"]);
        assert_eq!(sink.count(Severity::Error), 0);

        let failing = FakeRegistry::failing();
        Gate::new(&failing, &sink).authenticate(["monitor_uuid=ABCD-1234"]);
        assert_eq!(sink.count(Severity::Error), 1);
    }

    #[test]
    fn test_empty_device_set() {
        let registry = FakeRegistry::with_ids(&[]);
        let sink = RecordingSink::default();
        let gate = Gate::new(&registry, &sink);

        assert_eq!(gate.authenticate(["monitor_uuid=ABCD-1234"]), Verdict::Denied);
        assert_eq!(sink.count(Severity::Error), 0);
    }

    #[test]
    fn test_unusable_identifier_then_match() {
        let registry = FakeRegistry::with(vec![
            Property::Absent,
            Property::Unexpected("EDID truncated to 12 bytes".to_string()),
            Property::Text("ABCD-1234".to_string()),
        ]);
        let sink = RecordingSink::default();
        let gate = Gate::new(&registry, &sink);

        assert_eq!(gate.authenticate(["monitor_uuid=abcd-1234"]), Verdict::Granted);
    }

    #[test]
    fn test_idempotent() {
        let registry = FakeRegistry::with_ids(&["1111", "ABCD-1234"]);
        let sink = RecordingSink::default();
        let gate = Gate::new(&registry, &sink);

        let first = gate.authenticate(["monitor_uuid=ABCD-1234"]);
        let second = gate.authenticate(["monitor_uuid=ABCD-1234"]);
        assert_eq!(first, second);

        let first = gate.authenticate(["monitor_uuid=FFFF"]);
        let second = gate.authenticate(["monitor_uuid=FFFF"]);
        assert_eq!(first, second);
        assert_eq!(registry.counters.enumerations.get(), 4);
    }

    #[test]
    fn test_every_handle_released_once() {
        let registry = FakeRegistry::with_ids(&["ABCD-1234", "2222", "3333"]);
        let sink = RecordingSink::default();
        let gate = Gate::new(&registry, &sink);

        gate.authenticate(["monitor_uuid=ABCD-1234"]);
        gate.authenticate(["monitor_uuid=FFFF"]);

        assert_eq!(registry.counters.acquired.get(), 6);
        assert_eq!(registry.counters.released.get(), 6);
    }

    #[test]
    fn test_debug_reports_outcome() {
        let registry = FakeRegistry::with(vec![Property::Absent, Property::Text("1111".to_string())]);
        let sink = RecordingSink::default();
        let gate = Gate::new(&registry, &sink);

        assert_eq!(gate.authenticate(["monitor_uuid=ABCD-1234", "debug"]), Verdict::Denied);
        assert!(sink.contains(Severity::Info, "not found among 2 display(s)"));
        assert!(sink.contains(Severity::Info, "card0-DP-1 has no usable identifier"));
    }

    #[test]
    fn test_unknown_option_warned() {
        let registry = FakeRegistry::with_ids(&["ABCD-1234"]);
        let sink = RecordingSink::default();
        let gate = Gate::new(&registry, &sink);

        assert_eq!(
            gate.authenticate(["monitor_uuid=ABCD-1234", "try_first_pass"]),
            Verdict::Granted
        );
        assert!(sink.contains(Severity::Warning, "try_first_pass"));
    }

    #[test]
    fn test_custom_class_is_queried() {
        let registry = FakeRegistry::failing();
        let sink = RecordingSink::default();
        let gate = Gate::new(&registry, &sink).with_class(DeviceClass::new("test-class"));

        gate.authenticate(["monitor_uuid=ABCD-1234"]);
        assert!(sink.contains(Severity::Error, "test-class"));
    }
}
