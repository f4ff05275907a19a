//! Authenticated document generation and history.
//!
//! - `handlers` - final render to PDF and per-user listing
//! - `persistence` - background worker saving generated documents

pub mod handlers;
pub mod model;
pub mod persistence;
