use crate::error::{DirectoryError, Result};

/// Value type of a bridged property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    Int,
    Float,
    Bool,
}

impl PropertyType {
    /// Canonical listing tag.
    pub const fn tag(self) -> &'static str {
        match self {
            PropertyType::Int => "int",
            PropertyType::Float => "float",
            PropertyType::Bool => "bool",
        }
    }

    /// Parse a listing tag.
    ///
    /// Floating-point tags come in several spellings depending on the
    /// peer's property system; all of them map to [`PropertyType::Float`].
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag {
            "int" => Ok(PropertyType::Int),
            "float" | "double" | "qreal" | "real" => Ok(PropertyType::Float),
            "bool" => Ok(PropertyType::Bool),
            other => Err(DirectoryError::UnknownType(other.to_string())),
        }
    }

    /// Parse a textual value as this type.
    pub fn parse_value(self, input: &str) -> Result<PropertyValue> {
        let invalid = || DirectoryError::InvalidValue {
            kind: self.tag(),
            input: input.to_string(),
        };
        match self {
            PropertyType::Int => input
                .parse::<i64>()
                .map(PropertyValue::Int)
                .map_err(|_| invalid()),
            PropertyType::Float => input
                .parse::<f64>()
                .map(PropertyValue::Float)
                .map_err(|_| invalid()),
            PropertyType::Bool => match input {
                "true" | "1" | "on" => Ok(PropertyValue::Bool(true)),
                "false" | "0" | "off" => Ok(PropertyValue::Bool(false)),
                _ => Err(invalid()),
            },
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// A property value in application-wide types.
///
/// Values are held wide (i64/f64) until command construction, where
/// narrowing to the 32-bit wire fields is validated, never silent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl PropertyValue {
    /// The type this value belongs to.
    pub fn type_of(&self) -> PropertyType {
        match self {
            PropertyValue::Int(_) => PropertyType::Int,
            PropertyValue::Float(_) => PropertyType::Float,
            PropertyValue::Bool(_) => PropertyType::Bool,
        }
    }
}

impl std::fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyValue::Int(v) => write!(f, "{v}"),
            PropertyValue::Float(v) => write!(f, "{v}"),
            PropertyValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// Directory entry: wire id plus value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub id: u8,
    pub kind: PropertyType,
}

impl PropertyDescriptor {
    pub fn new(id: u8, kind: PropertyType) -> Self {
        Self { id, kind }
    }
}
