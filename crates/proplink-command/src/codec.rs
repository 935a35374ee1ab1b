use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{CommandError, Result};

/// Command kind discriminants.
///
/// Wire values are part of the protocol contract; 0x03 is deliberately
/// absent (unassigned in this revision).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Request the property directory listing.
    GetPropertyList,
    /// Set a 32-bit signed integer property.
    SetInt,
    /// Set a 32-bit float property.
    SetFloat,
    /// Set a boolean property.
    SetBool,
}

impl CommandKind {
    /// The kind byte as it appears on the wire.
    pub const fn wire_byte(self) -> u8 {
        match self {
            CommandKind::GetPropertyList => 0x00,
            CommandKind::SetInt => 0x01,
            CommandKind::SetFloat => 0x02,
            CommandKind::SetBool => 0x04,
        }
    }

    /// Parse a kind byte.
    pub fn from_wire(byte: u8) -> Result<Self> {
        match byte {
            0x00 => Ok(CommandKind::GetPropertyList),
            0x01 => Ok(CommandKind::SetInt),
            0x02 => Ok(CommandKind::SetFloat),
            0x04 => Ok(CommandKind::SetBool),
            other => Err(CommandError::UnknownKind(other)),
        }
    }

    /// Exact frame length for this kind: 2 header bytes plus the value
    /// field.
    pub const fn frame_len(self) -> usize {
        match self {
            CommandKind::GetPropertyList => 2,
            CommandKind::SetInt | CommandKind::SetFloat => 6,
            CommandKind::SetBool => 3,
        }
    }

    /// Human-readable name for diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            CommandKind::GetPropertyList => "GET_PROPERTY_LIST",
            CommandKind::SetInt => "SET_INT",
            CommandKind::SetFloat => "SET_FLOAT",
            CommandKind::SetBool => "SET_BOOL",
        }
    }
}

/// A decoded property command.
///
/// Constructed immediately before transmission, consumed immediately on
/// reception; never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Ask the peer to send its property directory.
    GetPropertyList,
    /// Set an integer property.
    SetInt { property_id: u8, value: i32 },
    /// Set a float property.
    SetFloat { property_id: u8, value: f32 },
    /// Set a boolean property.
    SetBool { property_id: u8, value: bool },
}

impl Command {
    /// Build a SET_INT command from a wide integer, rejecting values
    /// that do not fit the 32-bit wire field.
    pub fn set_int(property_id: u8, value: i64) -> Result<Self> {
        let value = i32::try_from(value).map_err(|_| CommandError::ValueOutOfRange {
            kind: CommandKind::SetInt.name(),
            value: value.to_string(),
        })?;
        Ok(Command::SetInt { property_id, value })
    }

    /// Build a SET_FLOAT command from a wide float, rejecting finite
    /// values that overflow the 32-bit wire field.
    pub fn set_float(property_id: u8, value: f64) -> Result<Self> {
        let narrowed = value as f32;
        if value.is_finite() && narrowed.is_infinite() {
            return Err(CommandError::ValueOutOfRange {
                kind: CommandKind::SetFloat.name(),
                value: value.to_string(),
            });
        }
        Ok(Command::SetFloat {
            property_id,
            value: narrowed,
        })
    }

    /// Build a SET_BOOL command.
    pub fn set_bool(property_id: u8, value: bool) -> Self {
        Command::SetBool { property_id, value }
    }

    /// This command's kind.
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::GetPropertyList => CommandKind::GetPropertyList,
            Command::SetInt { .. } => CommandKind::SetInt,
            Command::SetFloat { .. } => CommandKind::SetFloat,
            Command::SetBool { .. } => CommandKind::SetBool,
        }
    }

    /// The addressed property, if this command targets one.
    pub fn property_id(&self) -> Option<u8> {
        match self {
            Command::GetPropertyList => None,
            Command::SetInt { property_id, .. }
            | Command::SetFloat { property_id, .. }
            | Command::SetBool { property_id, .. } => Some(*property_id),
        }
    }

    /// Pack into the fixed wire layout.
    ///
    /// GET_PROPERTY_LIST carries no value field; its second byte is
    /// always written as zero.
    pub fn encode(&self) -> Bytes {
        let mut dst = BytesMut::with_capacity(self.kind().frame_len());
        dst.put_u8(self.kind().wire_byte());
        match *self {
            Command::GetPropertyList => dst.put_u8(0x00),
            Command::SetInt { property_id, value } => {
                dst.put_u8(property_id);
                dst.put_i32_le(value);
            }
            Command::SetFloat { property_id, value } => {
                dst.put_u8(property_id);
                dst.put_f32_le(value);
            }
            Command::SetBool { property_id, value } => {
                dst.put_u8(property_id);
                dst.put_u8(u8::from(value));
            }
        }
        dst.freeze()
    }

    /// Unpack a command from a reassembled frame payload.
    ///
    /// The frame length must match the kind's fixed length exactly.
    pub fn decode(frame: &[u8]) -> Result<Self> {
        let &kind_byte = frame.first().ok_or(CommandError::TruncatedFrame {
            kind: "command",
            expected: 2,
            actual: 0,
        })?;
        let kind = CommandKind::from_wire(kind_byte)?;

        if frame.len() != kind.frame_len() {
            return Err(CommandError::TruncatedFrame {
                kind: kind.name(),
                expected: kind.frame_len(),
                actual: frame.len(),
            });
        }

        let command = match kind {
            CommandKind::GetPropertyList => Command::GetPropertyList,
            CommandKind::SetInt => Command::SetInt {
                property_id: frame[1],
                value: i32::from_le_bytes(frame[2..6].try_into().unwrap()),
            },
            CommandKind::SetFloat => Command::SetFloat {
                property_id: frame[1],
                value: f32::from_le_bytes(frame[2..6].try_into().unwrap()),
            },
            CommandKind::SetBool => Command::SetBool {
                property_id: frame[1],
                value: frame[2] != 0,
            },
        };
        Ok(command)
    }
}
