// SPDX-License-Identifier: GPL-3.0-only
//! Identity matching over enumerated displays

use crate::registry::{DisplayDevice, Property};

/// Outcome of one pass over the enumerated devices
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanReport {
    /// Registry name of the device that matched, if any
    pub matched: Option<String>,
    /// Number of devices whose identifier was read
    pub inspected: usize,
    /// Devices passed over because they carry no usable identifier
    pub skipped: Vec<(String, Property)>,
}

impl ScanReport {
    pub fn is_match(&self) -> bool {
        self.matched.is_some()
    }
}

/// Case-insensitive identifier comparison
///
/// The device string is taken as-is; only the configured target is trimmed,
/// when the options are parsed.
pub fn identifiers_equal(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Look for `target` among `devices`, stopping at the first hit
///
/// Devices are consumed: each one is dropped as soon as it has been looked
/// at, and whatever is left after a hit is dropped with the iterator.
pub fn scan<I>(devices: I, target: &str) -> ScanReport
where
    I: IntoIterator,
    I::Item: DisplayDevice,
{
    let mut report = ScanReport::default();

    for device in devices {
        report.inspected += 1;

        match device.identifier() {
            Property::Text(id) if identifiers_equal(&id, target) => {
                debug!("Display {} matches {}", device.name(), target);
                report.matched = Some(device.name());
                break;
            }
            Property::Text(id) => {
                debug!("Display {} has identifier {}", device.name(), id);
            }
            other => {
                debug!("Skipping display {}: {:?}", device.name(), other);
                report.skipped.push((device.name(), other));
            }
        }
    }

    report
}

/// `true` if any of `devices` carries `target`
pub fn find_match<I>(devices: I, target: &str) -> bool
where
    I: IntoIterator,
    I::Item: DisplayDevice,
{
    scan(devices, target).is_match()
}
