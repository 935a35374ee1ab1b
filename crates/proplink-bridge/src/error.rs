/// Errors that can occur in bridge operations.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] proplink_transport::TransportError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] proplink_frame::FrameError),

    /// Command pack/unpack error.
    #[error("command error: {0}")]
    Command(#[from] proplink_command::CommandError),

    /// Directory error.
    #[error("directory error: {0}")]
    Directory(#[from] proplink_directory::DirectoryError),

    /// A set command addressed an id the table does not host.
    #[error("no property with id {0}")]
    UnknownPropertyId(u8),

    /// A set command's kind does not match the property's type.
    #[error("property {name:?} is {expected}, command carries {got}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        got: &'static str,
    },

    /// The command does not target a property slot.
    #[error("{0} does not target a property")]
    NotAPropertySet(&'static str),

    /// No directory has been fetched on this client yet.
    #[error("property directory not fetched")]
    NoDirectory,

    /// The peer did not send a listing before the deadline.
    #[error("timed out waiting for directory listing after {0:?}")]
    ListingTimeout(std::time::Duration),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
