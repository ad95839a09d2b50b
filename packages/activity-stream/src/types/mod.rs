//! Canonical data types shared across the engine.

mod connection;
mod item;
mod provider;
mod raw;
mod stream;

pub use connection::{Connection, ConnectionEvent};
pub use item::{ItemKind, NewStreamItem, StreamItem};
pub use provider::Provider;
pub use raw::RawPost;
pub use stream::{Stream, StreamConnection};
