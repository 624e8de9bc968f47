//! Unified application error type.
//! All modules (db, core, api, cli, export) return AppError to keep the error
//! handling consistent and easy to map at the request boundary.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing / validation errors
    // ---------------------------
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Lookup errors
    // ---------------------------
    #[error("Member not found: {0}")]
    MemberNotFound(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Outbound notification
    // ---------------------------
    #[error("Notification error: {0}")]
    Notify(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// Status code used when the error crosses the request/response boundary.
    pub fn status(&self) -> u16 {
        match self {
            AppError::MemberNotFound(_) => 404,
            AppError::Validation(_) | AppError::InvalidDate(_) | AppError::Json(_) => 400,
            _ => 500,
        }
    }

    /// True for errors whose message may be shown to the caller as-is.
    pub fn is_client_error(&self) -> bool {
        self.status() < 500
    }
}

pub type AppResult<T> = Result<T, AppError>;
