// Data structures and types

pub mod connection;
mod index;
mod index_id;

pub use connection::ProviderConfig;
pub use index::{DEFAULT_TIMEOUT_SECS, IndexKey, IndexSpec, IndexState, ObservedIndex};
pub use index_id::{ID_SEPARATOR, IndexId};
