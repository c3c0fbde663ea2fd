//! questboard/crates/domains/src/lib.rs
//!
//! The record types and storage contracts shared by every Questboard crate.

pub mod errors;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use errors::*;
pub use models::*;
pub use ports::*;
