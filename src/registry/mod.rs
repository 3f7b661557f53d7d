// SPDX-License-Identifier: GPL-3.0-only
//! Device registry access
//!
//! A registry hands out the displays that are attached right now. Each
//! platform backend yields owned handles that release their underlying
//! registry object when dropped.

#[cfg(target_os = "linux")]
mod drm;

#[cfg(target_os = "macos")]
mod iokit;

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
mod unsupported;

use crate::error::Result;

#[cfg(target_os = "linux")]
pub use self::drm::{Connector as SystemDevice, UdevRegistry as SystemRegistry};

#[cfg(target_os = "macos")]
pub use self::iokit::{IoKitRegistry as SystemRegistry, IoService as SystemDevice};

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
pub use self::unsupported::{NoDevice as SystemDevice, UnsupportedRegistry as SystemRegistry};

/// Selector for one class of registry devices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceClass(&'static str);

impl DeviceClass {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// DRM connectors, filtered down to the connected ones
#[cfg(target_os = "linux")]
pub const DISPLAY_CLASS: DeviceClass = DeviceClass::new("drm");

/// Display controllers, one service per attached panel
#[cfg(target_os = "macos")]
pub const DISPLAY_CLASS: DeviceClass = DeviceClass::new("AppleCLCD2");

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
pub const DISPLAY_CLASS: DeviceClass = DeviceClass::new("display");

/// Value of a device's identifier property
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Property {
    /// The device carries no identifier
    Absent,
    /// A readable identifier
    Text(String),
    /// Something is there but it is not a usable string
    Unexpected(String),
}

/// One attached display, alive for a single enumeration pass
pub trait DisplayDevice {
    /// Registry name of the device, for diagnostics only
    fn name(&self) -> String;

    /// Read the display descriptor identifier
    fn identifier(&self) -> Property;
}

/// Live catalog of attached devices
pub trait DeviceRegistry {
    type Device: DisplayDevice;

    /// Query the registry once for every attached device of `class`
    ///
    /// An empty list is a normal answer. Errors are reserved for the query
    /// itself failing.
    fn enumerate(&self, class: DeviceClass) -> Result<Vec<Self::Device>>;
}

impl<R: DeviceRegistry + ?Sized> DeviceRegistry for &R {
    type Device = R::Device;

    fn enumerate(&self, class: DeviceClass) -> Result<Vec<Self::Device>> {
        (**self).enumerate(class)
    }
}
