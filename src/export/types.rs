//! Wire and state types for the export protocol.

use serde::Deserialize;

/// Status payload returned by every export status endpoint. All fields are
/// optional on the wire; older pages omit `done` and only report progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExportStatus {
    #[serde(default)]
    pub done: Option<bool>,
    #[serde(default)]
    pub progress: Option<u8>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ExportStatus {
    pub fn running(progress: u8) -> Self {
        ExportStatus {
            done: Some(false),
            progress: Some(progress),
            error: None,
        }
    }

    pub fn finished() -> Self {
        ExportStatus {
            done: Some(true),
            progress: Some(100),
            error: None,
        }
    }

    pub fn failed(message: &str) -> Self {
        ExportStatus {
            done: Some(true),
            progress: None,
            error: Some(message.to_string()),
        }
    }
}

/// Lifecycle of one export attempt.
#[derive(Debug, Copy, Clone, PartialEq, Eq, strum::Display)]
pub enum ExportState {
    /// Start request issued, no status seen yet.
    Pending,
    /// At least one status tick observed, job not terminal.
    Running,
    /// Job finished; download may proceed.
    Done,
    /// Terminal failure; no download.
    Failed,
}

/// How a variant signals completion. Pages written against the older status
/// endpoints have no `done` flag and treat 100% progress as terminal.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CompletionPredicate {
    DoneFlag,
    ProgressComplete,
}

impl CompletionPredicate {
    pub fn is_complete(&self, status: &ExportStatus) -> bool {
        match self {
            CompletionPredicate::DoneFlag => status.done.unwrap_or(false),
            CompletionPredicate::ProgressComplete => status.progress.unwrap_or(0) >= 100,
        }
    }
}

/// A downloaded export payload, before it is written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDownload {
    pub bytes: Vec<u8>,
    /// Filename extracted from the Content-Disposition header, if any.
    pub filename: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn done_flag_predicate_ignores_progress() {
        let p = CompletionPredicate::DoneFlag;
        assert!(!p.is_complete(&ExportStatus::running(100)));
        assert!(p.is_complete(&ExportStatus::finished()));
        assert!(!p.is_complete(&ExportStatus::default()));
    }

    #[test]
    fn progress_predicate_completes_at_one_hundred() {
        let p = CompletionPredicate::ProgressComplete;
        assert!(!p.is_complete(&ExportStatus::running(99)));
        assert!(p.is_complete(&ExportStatus {
            done: None,
            progress: Some(100),
            error: None,
        }));
    }

    #[test]
    fn status_deserializes_with_missing_fields() {
        let status: ExportStatus = serde_json::from_str("{\"progress\": 55}").unwrap();
        assert_eq!(status.done, None);
        assert_eq!(status.progress, Some(55));
        assert_eq!(status.error, None);

        let status: ExportStatus =
            serde_json::from_str("{\"done\": true, \"error\": \"disk full\"}").unwrap();
        assert_eq!(status.error.as_deref(), Some("disk full"));
    }
}
