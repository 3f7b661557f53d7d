// SPDX-License-Identifier: GPL-3.0-only
//! Fallback for platforms without a known display registry
//!
//! Enumeration always fails, so the gate denies every attempt.

use crate::error::{GateError, Result};

use super::{DeviceClass, DeviceRegistry, DisplayDevice, Property};

#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedRegistry;

#[derive(Debug)]
pub enum NoDevice {}

impl DisplayDevice for NoDevice {
    fn name(&self) -> String {
        match *self {}
    }

    fn identifier(&self) -> Property {
        match *self {}
    }
}

impl DeviceRegistry for UnsupportedRegistry {
    type Device = NoDevice;

    fn enumerate(&self, class: DeviceClass) -> Result<Vec<NoDevice>> {
        Err(GateError::enumeration(
            class.name(),
            std::io::Error::from(std::io::ErrorKind::Unsupported),
        ))
    }
}
