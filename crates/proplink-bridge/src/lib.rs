//! Bridge session management.
//!
//! This is the "just works" layer. A bridge hosts a table of named,
//! typed properties; clients connect over a stream transport, discover
//! the table, and write property values with compact framed commands.
//!
//! One [`BridgeSession`] per accepted connection, one [`BridgeClient`]
//! per outbound connection — each owns its decoder state, so
//! connections never interfere.

pub mod client;
pub mod error;
pub mod route;
pub mod session;
pub mod table;

pub use client::BridgeClient;
pub use error::{BridgeError, Result};
pub use route::Inbound;
pub use session::{BridgeSession, SharedTable, HEARTBEAT_INTERVAL};
pub use table::{PropertyTable, PropertyUpdate};
