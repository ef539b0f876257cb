//! Durable storage for daily weather summaries (MySQL)
//!
//! The summary table is created on startup if it does not exist yet.

pub mod client;
pub mod queries;
pub mod schema;

pub use client::*;
pub use schema::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("Unsupported database URL: {0}")]
    UnsupportedUrl(String),

    #[error("Cannot store non-finite {field} ({value})")]
    NonFinite { field: &'static str, value: f64 },
}

pub type DbResult<T> = Result<T, DbError>;
