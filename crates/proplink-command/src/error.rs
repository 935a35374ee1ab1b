/// Errors that can occur during command frame packing/unpacking.
///
/// A malformed command frame means a protocol version mismatch or
/// corruption that survived framing; the caller decides whether to log,
/// drop, or disconnect.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The first byte is not a recognized command kind.
    #[error("unknown command kind 0x{0:02X}")]
    UnknownKind(u8),

    /// The frame length does not match the fixed length for its kind.
    #[error("{kind} frame length mismatch ({actual} bytes, expected {expected})")]
    TruncatedFrame {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A wide value does not fit the 32-bit wire field. The codec never
    /// clamps; callers validate or reject upstream.
    #[error("value {value} does not fit the {kind} wire field")]
    ValueOutOfRange {
        kind: &'static str,
        value: String,
    },
}

pub type Result<T> = std::result::Result<T, CommandError>;
