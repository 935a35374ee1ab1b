//! Wire constants for bridge-originated marker frames.
//!
//! The listing reply and the reload notice are framing-within-framing:
//! a two-byte marker in front of a newline-terminated text document.
//! The heartbeat is a single marker byte on its own.

/// Prefix of a property directory listing frame.
pub const LISTING_MARKER: [u8; 2] = [0xFF, 0xFF];

/// Prefix of a "source reloaded" notice frame.
pub const RELOAD_MARKER: [u8; 2] = [0xFF, 0xFE];

/// The complete reload notice payload.
pub const RELOAD_NOTICE: &[u8] = &[0xFF, 0xFE, b'r', b'e', b'l', b'o', b'a', b'd', b'\n'];

/// A keep-alive frame: exactly one `0xFF` byte.
pub const HEARTBEAT: [u8; 1] = [0xFF];
