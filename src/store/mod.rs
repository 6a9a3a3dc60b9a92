/// Remote store access
///
/// The shop keeps all durable state in a remote JSON document store
/// spoken to over plain HTTP REST. This module wraps those calls; it
/// carries no business logic of its own.
pub mod client;

pub use client::{StoreClient, StoreError};

/// Resource kinds the store holds, one collection per kind
pub const PHOTOS: &str = "photos";
pub const DOCUMENTS: &str = "documents";
