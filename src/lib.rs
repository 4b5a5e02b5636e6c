//! Declarative MongoDB index resource.
//!
//! [`resource::IndexReconciler`] maps an [`models::IndexSpec`] onto MongoDB's
//! index commands and records the result as an [`models::IndexState`] keyed by
//! a stable [`models::IndexId`].

pub mod bson;
pub mod connection;
pub mod error;
pub mod helpers;
pub mod models;
pub mod resource;
pub mod state;

pub use error::{Error, Result};
