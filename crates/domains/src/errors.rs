//! # AppError
//!
//! Centralized error handling for the Questboard ecosystem.
//! Every port returns this type so adapters and services agree on failures.

use std::fmt::Display;

use thiserror::Error;

/// The primary error type for all store and service operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Lookup by id or username matched nothing (e.g., character, party, session)
    #[error("{0} not found with ID {1}")]
    NotFound(&'static str, String),

    /// Payload lacks a field the server needs (e.g., party leader)
    #[error("validation error: {0}")]
    Validation(String),

    /// Infrastructure failure (e.g., database locked, write rejected)
    #[error("storage failure: {0}")]
    Storage(String),
}

impl AppError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        AppError::NotFound(entity, id.into())
    }

    /// Wraps any driver or codec error as a storage failure.
    pub fn storage(err: impl Display) -> Self {
        AppError::Storage(err.to_string())
    }
}

/// A specialized Result type for Questboard logic.
pub type Result<T> = std::result::Result<T, AppError>;
