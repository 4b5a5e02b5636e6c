//! MongoDB connection management and index operations.
//!
//! This module provides:
//! - `ConnectionManager`: Tokio runtime plus client setup from a `ProviderConfig`
//! - `ops`: blocking wrappers over the driver's index calls
//! - `IndexClient`: the capability the reconciler is written against, and
//!   `MongoIndexClient`, its live implementation

pub mod client;
pub mod manager;
pub mod ops;

pub use client::{IndexClient, MongoIndexClient};
pub use manager::ConnectionManager;
