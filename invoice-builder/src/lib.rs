//! invoice-builder: Draft assembly for the invoicing desktop client.
//!
//! Owns the in-memory invoice draft, derives its totals on demand, and
//! drives the populate and save flows against the backend gateway.

pub mod models;
pub mod services;

pub use models::{InvoiceDraft, LineItem};
pub use services::{clear_client, populate_from_client, submit_draft, SubmitError};
