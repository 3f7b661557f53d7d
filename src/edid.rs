// SPDX-License-Identifier: GPL-3.0-only
//! EDID UUID derivation
//!
//! macOS publishes an `EDID UUID` property for every attached display. It is
//! nothing more than the 16 bytes following the EDID header (vendor, product,
//! serial, manufacture date, version, basic display parameters) printed as a
//! UUID. Linux only exposes the raw blob, so the same string is rebuilt here
//! to keep `monitor_uuid=` portable between the two.

use std::fmt::Write;

use crate::registry::Property;

/// Fixed 8-byte pattern every base EDID block starts with
pub const HEADER: [u8; 8] = [0x00, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x00];

/// Size of the base EDID block
pub const BLOCK_SIZE: usize = 128;

/// Bytes of the base block folded into the identifier
const UUID_BYTES: std::ops::Range<usize> = 8..24;

/// Turn a raw EDID blob into the identifier property of its display
///
/// An empty blob means the connector has no EDID (nothing attached, or a
/// sink that never answered) and reads as [`Property::Absent`]. Anything
/// that is not a well formed base block is [`Property::Unexpected`].
pub fn identifier(blob: &[u8]) -> Property {
    if blob.is_empty() {
        return Property::Absent;
    }

    if blob.len() < BLOCK_SIZE {
        return Property::Unexpected(format!("EDID truncated to {} bytes", blob.len()));
    }

    if blob[..HEADER.len()] != HEADER {
        return Property::Unexpected("EDID header mismatch".to_string());
    }

    Property::Text(format_uuid(&blob[UUID_BYTES]))
}

/// Print 16 bytes as an upper-case 8-4-4-4-12 UUID
fn format_uuid(bytes: &[u8]) -> String {
    debug_assert_eq!(bytes.len(), 16);

    let mut out = String::with_capacity(36);
    for (i, byte) in bytes.iter().enumerate() {
        if matches!(i, 4 | 6 | 8 | 10) {
            out.push('-');
        }
        let _ = write!(out, "{byte:02X}");
    }
    out
}
