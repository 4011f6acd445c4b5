//! Per-entity store instantiations, one module per dashboard view.
//!
//! Each module wires the generic [`crate::store::ResourceStore`] to the
//! typed API client and adds whatever pure derivations its view needs.
//! Components consume these stores; they never call the API client directly.

pub mod analytics;
pub mod clients;
pub mod communications;
pub mod consultants;
pub mod dashboard;
pub mod documents;
pub mod employees;
pub mod finance;
pub mod leads;
pub mod notifications;
pub mod orders;
pub mod security;
