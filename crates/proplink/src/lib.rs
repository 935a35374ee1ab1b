//! Property bridge over SLIP-style framing.
//!
//! proplink exchanges typed property updates over any order-preserving
//! byte stream — framing, command packing, discovery, and session
//! management, each in its own layer.
//!
//! # Crate Structure
//!
//! - [`transport`] — TCP stream transport
//! - [`frame`] — SLIP-style framing codec and blocking framed I/O
//! - [`command`] — fixed-layout property command frames
//! - [`directory`] — property directory and discovery listing
//! - [`bridge`] — per-connection session management

/// Re-export transport types.
pub mod transport {
    pub use proplink_transport::*;
}

/// Re-export framing types.
pub mod frame {
    pub use proplink_frame::*;
}

/// Re-export command types.
pub mod command {
    pub use proplink_command::*;
}

/// Re-export directory types.
pub mod directory {
    pub use proplink_directory::*;
}

/// Re-export bridge types.
pub mod bridge {
    pub use proplink_bridge::*;
}
