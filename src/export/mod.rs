//! Asynchronous export jobs: start, poll, download, save.

pub mod coordinator;
pub mod download;
pub mod error;
pub mod target;
pub mod types;

pub use coordinator::{ExportCoordinator, PollOptions};
pub use error::ExportError;
pub use target::ExportTarget;
pub use types::{ExportDownload, ExportState, ExportStatus};
