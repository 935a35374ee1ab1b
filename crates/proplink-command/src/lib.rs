//! Fixed-layout property command frames.
//!
//! The payload carried inside each frame is one of four compact,
//! little-endian command layouts: a 2-byte directory request, or a
//! set-value command with a 1-byte property id and a 4-byte (int/float)
//! or 1-byte (bool) value field.
//!
//! Pure pack/unpack — no state, no I/O, safe to call from anywhere.

pub mod codec;
pub mod error;

pub use codec::{Command, CommandKind};
pub use error::{CommandError, Result};
