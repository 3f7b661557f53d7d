// SPDX-License-Identifier: GPL-3.0-only
//! DRM connectors through udev
//!
//! Every connector of every GPU shows up in the `drm` subsystem as
//! `card<N>-<connector>` (e.g. `card1-DP-2`). Only connectors whose `status`
//! attribute reads `connected` have a display behind them. The EDID is read
//! straight from sysfs: udev's attribute cache stops at the first NUL byte,
//! which makes it useless for binary blobs.

use std::path::PathBuf;

use crate::edid;
use crate::error::{GateError, Result};

use super::{DeviceClass, DeviceRegistry, DisplayDevice, Property};

/// sysfs attribute holding the raw EDID of a connector
const EDID_ATTRIBUTE: &str = "edid";

/// Queries udev for connected DRM connectors
#[derive(Debug, Default, Clone, Copy)]
pub struct UdevRegistry;

/// A connected DRM connector
///
/// Wraps the udev device reference, which is dropped (unref'd) together
/// with this handle.
pub struct Connector {
    device: ::udev::Device,
}

impl Connector {
    fn edid_path(&self) -> PathBuf {
        self.device.syspath().join(EDID_ATTRIBUTE)
    }
}

impl DisplayDevice for Connector {
    fn name(&self) -> String {
        self.device.sysname().to_string_lossy().into_owned()
    }

    fn identifier(&self) -> Property {
        let path = self.edid_path();
        match std::fs::read(&path) {
            Ok(blob) => edid::identifier(&blob),
            Err(e) => {
                debug!("Can't read {}: {}", path.display(), e);
                Property::Absent
            }
        }
    }
}

impl std::fmt::Debug for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Connector({})", self.device.syspath().display())
    }
}

impl DeviceRegistry for UdevRegistry {
    type Device = Connector;

    fn enumerate(&self, class: DeviceClass) -> Result<Vec<Connector>> {
        let scan = || -> std::io::Result<Vec<Connector>> {
            let mut enumerator = ::udev::Enumerator::new()?;
            enumerator.match_subsystem(class.name())?;
            enumerator.match_attribute("status", "connected")?;

            let connectors = enumerator
                .scan_devices()?
                .filter(|device| is_connector_name(&device.sysname().to_string_lossy()))
                .map(|device| Connector { device })
                .collect();
            Ok(connectors)
        };

        let connectors = scan().map_err(|e| GateError::enumeration(class.name(), e))?;
        debug!("Found {} connected {} connector(s)", connectors.len(), class);
        Ok(connectors)
    }
}

/// `card<N>-<connector>`, as opposed to `card<N>` or `renderD<N>`
fn is_connector_name(sysname: &str) -> bool {
    let Some(rest) = sysname.strip_prefix("card") else {
        return false;
    };

    match rest.split_once('-') {
        Some((index, connector)) => {
            !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) && !connector.is_empty()
        }
        None => false,
    }
}
