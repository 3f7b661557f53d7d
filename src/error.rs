// SPDX-License-Identifier: GPL-3.0-only
//! Error types for the presence check
//!
//! Every error here is recovered inside the module: the gate logs it and
//! turns it into a denial. None of them ever reaches the PAM host.

use thiserror::Error;

/// Failures of one authentication attempt
#[derive(Error, Debug)]
pub enum GateError {
    /// `monitor_uuid=` was not supplied (or was empty)
    #[error("No monitor_uuid argument provided")]
    MissingTarget,

    /// The device registry could not be queried
    #[error("failed to enumerate {class} devices: {source}")]
    Enumeration {
        class: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl GateError {
    pub fn enumeration(class: &'static str, source: std::io::Error) -> Self {
        Self::Enumeration { class, source }
    }
}

/// Result type alias for GateError
pub type Result<T> = std::result::Result<T, GateError>;
