/// State management module
///
/// This module holds all application state, independent of the UI:
/// - Shared record types (data.rs)
/// - Photo repository and intake pipeline (gallery.rs)
/// - Document collection and invoice engine (documents.rs)
pub mod data;
pub mod documents;
pub mod gallery;
