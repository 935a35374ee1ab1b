//! SLIP-style byte framing for streams without message boundaries.
//!
//! This is the core layer of proplink. A serial line or stream socket
//! delivers bytes with no packet structure; this crate delimits
//! variable-length binary payloads inside that stream:
//! - Every frame ends with a `0xC0` terminator
//! - Payload bytes that collide with the reserved values are sent as
//!   two-byte escape sequences
//! - The decoder consumes input byte by byte and behaves identically
//!   no matter how the transport chunks delivery
//!
//! No partial reads, no buffer management in user code.

pub mod codec;
pub mod decoder;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{
    encode, encode_into, FrameConfig, DEFAULT_MAX_FRAME_SIZE, ESCAPE, ESCAPED_END, ESCAPED_ESCAPE,
    FRAME_END,
};
pub use decoder::SlipDecoder;
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::FrameWriter;
