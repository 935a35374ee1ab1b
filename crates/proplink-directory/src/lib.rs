//! Property directory and discovery listing.
//!
//! A bridge exposes named, typed properties addressed on the wire by a
//! small integer id. The directory is the name → {id, type} mapping; it
//! travels as a marked listing frame (two `0xFF` bytes, a compact JSON
//! document, a terminating newline) in reply to a GET_PROPERTY_LIST
//! command.
//!
//! The framing and command layers never parse the listing — they only
//! see an opaque frame. This crate owns the document format and the
//! typed-command construction against a directory entry.

pub mod directory;
pub mod error;
pub mod listing;
pub mod property;

pub use directory::PropertyDirectory;
pub use error::{DirectoryError, Result};
pub use listing::{HEARTBEAT, LISTING_MARKER, RELOAD_MARKER, RELOAD_NOTICE};
pub use property::{PropertyDescriptor, PropertyType, PropertyValue};
