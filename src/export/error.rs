//! Error handling for the export module

use std::time::Duration;

use thiserror::Error;

use crate::api::ApiError;

/// Terminal outcomes of one export attempt. None of these are retried; each
/// maps to a single user-visible message.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The start call failed; no polling began.
    #[error("Export failed to start: {0}")]
    Start(ApiError),

    /// The start call succeeded but returned no usable task id.
    #[error("Export start returned an empty task id")]
    EmptyTaskId,

    /// A status poll failed.
    #[error("Export status check failed: {0}")]
    Status(ApiError),

    /// The job itself failed server-side.
    #[error("Export failed: {0}")]
    Job(String),

    /// The job finished but the download call failed.
    #[error("Export download failed: {0}")]
    Download(ApiError),

    /// Writing the downloaded file locally failed.
    #[error("Failed to save export: {0}")]
    Save(#[from] std::io::Error),

    /// The opt-in polling deadline elapsed before the job finished.
    #[error("Export did not finish within {0:?}")]
    TimedOut(Duration),

    /// The attempt was cancelled.
    #[error("Export cancelled")]
    Cancelled,
}
