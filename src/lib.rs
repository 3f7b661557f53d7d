// SPDX-License-Identifier: GPL-3.0-only
//! PAM module granting login only while a given display is attached
//!
//! The display is named by its EDID UUID. On every `auth` call the attached
//! displays are enumerated and their identifiers compared, case-insensitively,
//! with `monitor_uuid=`. Nothing is cached between calls.

#[macro_use]
extern crate tracing;

pub mod edid;
pub mod error;
pub mod gate;
pub mod matcher;
pub mod options;
pub mod pam;
pub mod registry;
pub mod sink;

pub use error::{GateError, Result};
pub use gate::{Gate, Verdict};
pub use options::Options;
