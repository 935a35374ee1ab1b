//! Stream transport for the proplink property bridge.
//!
//! Supplies connected byte streams to the framing layer. The framing and
//! command codecs only require `Read + Write`, so any order-preserving
//! byte stream fits — this crate ships the TCP flavor. A serial port can
//! be slotted in by the caller through the same seam.
//!
//! This is the lowest layer of proplink. Everything else builds on top of
//! the [`LinkStream`] type provided here.

pub mod error;
pub mod stream;
pub mod tcp;

pub use error::{Result, TransportError};
pub use stream::LinkStream;
pub use tcp::TcpServer;
