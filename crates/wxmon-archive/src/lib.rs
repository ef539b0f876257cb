//! Daily summary archiving
//!
//! Stamps monitor snapshots with the day they summarize and hands them to
//! a [`SummaryStore`](wxmon_core::SummaryStore).

pub mod archiver;
pub mod memory;

pub use archiver::*;
pub use memory::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("No observations recorded yet for {0}")]
    EmptySnapshot(String),

    #[error("Invalid summary date: {0}")]
    InvalidDate(String),

    #[error("Storage error: {0:#}")]
    Store(#[from] anyhow::Error),
}

pub type ArchiveResult<T> = Result<T, ArchiveError>;
