//! The index resource: key codec, change detection and lifecycle operations.

pub mod keys;
pub mod plan;
pub mod reconciler;

pub use keys::{InlineOptions, KeyValue, TTL_FIELD, UNIQUE_FIELD};
pub use plan::IndexChanges;
pub use reconciler::{IndexReconciler, build_index_model};
