/// Errors that can occur in directory operations.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// The listing payload does not start with the discovery marker.
    #[error("listing payload missing the 0xFF 0xFF marker")]
    MissingMarker,

    /// The listing document is not valid JSON of the expected shape.
    #[error("invalid listing document: {0}")]
    InvalidListing(#[from] serde_json::Error),

    /// A listing entry carries a type tag this revision does not know.
    #[error("unknown property type tag {0:?}")]
    UnknownType(String),

    /// The named property is not in the directory.
    #[error("unknown property {0:?}")]
    UnknownProperty(String),

    /// Two properties claim the same wire id.
    #[error("property id {id} already assigned to {name:?}")]
    DuplicateId { id: u8, name: String },

    /// The supplied value's type does not match the property's type.
    #[error("property {name:?} is {expected}, got a {got} value")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        got: &'static str,
    },

    /// A textual value does not parse as the property's type.
    #[error("cannot parse {input:?} as {kind}")]
    InvalidValue { kind: &'static str, input: String },

    /// Command construction failed (value out of wire range).
    #[error(transparent)]
    Command(#[from] proplink_command::CommandError),
}

pub type Result<T> = std::result::Result<T, DirectoryError>;
