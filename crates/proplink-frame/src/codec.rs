use bytes::{BufMut, Bytes, BytesMut};

/// Frame terminator.
pub const FRAME_END: u8 = 0xC0;

/// Escape introducer.
pub const ESCAPE: u8 = 0xDB;

/// Escaped substitute for [`FRAME_END`].
pub const ESCAPED_END: u8 = 0xDC;

/// Escaped substitute for [`ESCAPE`].
pub const ESCAPED_ESCAPE: u8 = 0xDD;

/// Default maximum frame size: 64 KiB.
pub const DEFAULT_MAX_FRAME_SIZE: usize = 64 * 1024;

/// Encode a payload into the wire format.
///
/// Wire format:
/// ```text
/// ┌────────────────────────────────────────────┬───────────┐
/// │ Payload, 0xC0 → 0xDB 0xDC, 0xDB → 0xDB 0xDD │ END 0xC0  │
/// └────────────────────────────────────────────┴───────────┘
/// ```
///
/// Total: encoding never fails, preserves byte order, and a zero-length
/// payload encodes to a single terminator byte.
pub fn encode(payload: &[u8]) -> Bytes {
    let mut dst = BytesMut::with_capacity(payload.len() + 1);
    encode_into(payload, &mut dst);
    dst.freeze()
}

/// Encode a payload, appending the wire bytes to `dst`.
pub fn encode_into(payload: &[u8], dst: &mut BytesMut) {
    dst.reserve(payload.len() + 1);
    for &byte in payload {
        match byte {
            FRAME_END => {
                dst.put_u8(ESCAPE);
                dst.put_u8(ESCAPED_END);
            }
            ESCAPE => {
                dst.put_u8(ESCAPE);
                dst.put_u8(ESCAPED_ESCAPE);
            }
            other => dst.put_u8(other),
        }
    }
    dst.put_u8(FRAME_END);
}

/// Configuration for framed I/O.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum accumulated frame size in bytes. Default: 64 KiB.
    ///
    /// Bounds decoder memory against a stream that never delivers a
    /// terminator; oversized frames are dropped and the decoder resyncs
    /// at the next terminator.
    pub max_frame_size: usize,
    /// Read timeout for blocking operations.
    pub read_timeout: Option<std::time::Duration>,
    /// Write timeout for blocking operations.
    pub write_timeout: Option<std::time::Duration>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            read_timeout: None,
            write_timeout: None,
        }
    }
}
