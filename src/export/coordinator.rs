//! The export coordinator: drives one start → poll → download attempt
//! against the quality-system API without blocking the terminal.
//!
//! Status polls are strictly sequential; each tick's request finishes (or
//! fails) before the next is scheduled. Polling is unbounded by default,
//! matching the dashboards this replaces; callers may opt into a deadline
//! or hand in a cancellation token.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;

use crate::api::DashboardApi;
use crate::events::{EventSender, EventType};
use crate::export::download::save_export;
use crate::export::error::ExportError;
use crate::export::target::ExportTarget;
use crate::export::types::{ExportDownload, ExportState};

/// Optional bounds on the poll loop. The default reproduces the original
/// behavior: poll until the server answers, forever if it never does.
#[derive(Debug, Clone, Default)]
pub struct PollOptions {
    /// Fail the attempt once this much time has been spent polling.
    pub deadline: Option<Duration>,
    /// External cancellation, e.g. from a Ctrl-C handler.
    pub cancel: Option<CancellationToken>,
}

pub struct ExportCoordinator<'a> {
    api: &'a dyn DashboardApi,
    events: EventSender,
    options: PollOptions,
    state: ExportState,
}

impl<'a> ExportCoordinator<'a> {
    pub fn new(api: &'a dyn DashboardApi, events: EventSender) -> Self {
        Self::with_options(api, events, PollOptions::default())
    }

    pub fn with_options(
        api: &'a dyn DashboardApi,
        events: EventSender,
        options: PollOptions,
    ) -> Self {
        Self {
            api,
            events,
            options,
            state: ExportState::Pending,
        }
    }

    pub fn state(&self) -> ExportState {
        self.state
    }

    /// Runs one export attempt to completion. Taking `&mut self` keeps at
    /// most one attempt in flight per coordinator, so only one writer ever
    /// updates the progress indicator.
    pub async fn run(&mut self, target: &ExportTarget) -> Result<ExportDownload, ExportError> {
        self.state = ExportState::Pending;
        self.events
            .send_export_event(
                format!("Starting {} export...", target.label()),
                EventType::Refresh,
                crate::logging::LogLevel::Info,
            )
            .await;

        let task_id = match self.api.start_export(target).await {
            Ok(task_id) => task_id,
            Err(e) => {
                self.state = ExportState::Failed;
                let err = ExportError::Start(e);
                self.report(&err).await;
                return Err(err);
            }
        };
        if task_id.is_empty() {
            self.state = ExportState::Failed;
            let err = ExportError::EmptyTaskId;
            self.report(&err).await;
            return Err(err);
        }

        let download = match self.poll_until_done(target, &task_id).await {
            Ok(()) => match self.api.download_export(target, &task_id).await {
                Ok(download) => download,
                Err(e) => {
                    self.state = ExportState::Failed;
                    let err = ExportError::Download(e);
                    self.report(&err).await;
                    return Err(err);
                }
            },
            Err(err) => {
                self.state = ExportState::Failed;
                self.report(&err).await;
                return Err(err);
            }
        };

        self.events
            .send_export_event(
                format!("{} export ready ({} bytes)", target.label(), download.bytes.len()),
                EventType::Success,
                crate::logging::LogLevel::Info,
            )
            .await;
        Ok(download)
    }

    /// Runs one attempt and writes the result under `dir`.
    pub async fn run_to_file(
        &mut self,
        target: &ExportTarget,
        dir: &Path,
    ) -> Result<PathBuf, ExportError> {
        let download = self.run(target).await?;
        let path = save_export(dir, &download, &target.filename_stem())?;
        Ok(path)
    }

    /// The poll loop: sleeps the target's interval, checks status, repeats
    /// until the completion predicate holds or a terminal failure occurs.
    async fn poll_until_done(
        &mut self,
        target: &ExportTarget,
        task_id: &str,
    ) -> Result<(), ExportError> {
        let interval = target.poll_interval();
        let completion = target.completion();
        let started = Instant::now();
        let mut best_progress: u8 = 0;

        loop {
            if let Some(deadline) = self.options.deadline {
                if started.elapsed() + interval > deadline {
                    return Err(ExportError::TimedOut(deadline));
                }
            }
            match &self.options.cancel {
                Some(cancel) => {
                    tokio::select! {
                        _ = cancel.cancelled() => return Err(ExportError::Cancelled),
                        _ = sleep(interval) => {}
                    }
                }
                None => sleep(interval).await,
            }

            let status = self
                .api
                .export_status(target, task_id)
                .await
                .map_err(ExportError::Status)?;

            if let Some(message) = status.error {
                return Err(ExportError::Job(message));
            }
            if let Some(progress) = status.progress {
                // Monotone display: a tick reporting less than a previous
                // one never moves the indicator backwards.
                best_progress = best_progress.max(progress.min(100));
                self.events.send_progress(best_progress).await;
            }
            if completion.is_complete(&status) {
                self.state = ExportState::Done;
                return Ok(());
            }
            self.state = ExportState::Running;
        }
    }

    async fn report(&self, err: &ExportError) {
        let level = match err {
            ExportError::Start(api) | ExportError::Status(api) | ExportError::Download(api) => {
                api.log_level()
            }
            _ => crate::logging::LogLevel::Error,
        };
        self.events
            .send_export_event(err.to_string(), EventType::Error, level)
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, MockDashboardApi};
    use crate::events::Event;
    use crate::export::types::ExportStatus;
    use crate::filters::CellFilters;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };
    use tokio::sync::mpsc;

    fn target() -> ExportTarget {
        ExportTarget::Cells(CellFilters::default())
    }

    fn event_channel() -> (EventSender, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(100);
        (EventSender::new(tx), rx)
    }

    fn drain_progress(rx: &mut mpsc::Receiver<Event>) -> Vec<u8> {
        let mut progress = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let Some(percent) = event.progress {
                progress.push(percent);
            }
        }
        progress
    }

    /// Scripts the status endpoint to answer a fixed sequence, then keeps
    /// repeating the last entry.
    fn script_statuses(mock: &mut MockDashboardApi, statuses: Vec<ExportStatus>) {
        let calls = Arc::new(AtomicUsize::new(0));
        mock.expect_export_status().returning(move |_, _| {
            let i = calls.fetch_add(1, Ordering::SeqCst).min(statuses.len() - 1);
            Ok(statuses[i].clone())
        });
    }

    #[tokio::test(start_paused = true)]
    async fn completes_and_downloads_with_server_filename() {
        let mut mock = MockDashboardApi::new();
        mock.expect_start_export()
            .times(1)
            .returning(|_| Ok("task1".to_string()));
        script_statuses(
            &mut mock,
            vec![ExportStatus::running(40), ExportStatus::finished()],
        );
        mock.expect_download_export()
            .times(1)
            .withf(|_, task_id| task_id == "task1")
            .returning(|_, _| {
                Ok(ExportDownload {
                    bytes: b"PK\x03\x04".to_vec(),
                    filename: Some("export.xlsx".to_string()),
                })
            });

        let (events, mut rx) = event_channel();
        let mut coordinator = ExportCoordinator::new(&mock, events);
        let download = coordinator.run(&target()).await.unwrap();

        assert_eq!(download.filename.as_deref(), Some("export.xlsx"));
        assert_eq!(coordinator.state(), ExportState::Done);
        assert_eq!(drain_progress(&mut rx), vec![40, 100]);
    }

    #[tokio::test(start_paused = true)]
    async fn job_error_fails_without_download() {
        let mut mock = MockDashboardApi::new();
        mock.expect_start_export()
            .times(1)
            .returning(|_| Ok("task2".to_string()));
        script_statuses(&mut mock, vec![ExportStatus::failed("disk full")]);
        mock.expect_download_export().times(0);

        let (events, _rx) = event_channel();
        let mut coordinator = ExportCoordinator::new(&mock, events);
        let err = coordinator.run(&target()).await.unwrap_err();

        assert!(err.to_string().contains("disk full"));
        assert_eq!(coordinator.state(), ExportState::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_start_never_polls() {
        let mut mock = MockDashboardApi::new();
        mock.expect_start_export().times(1).returning(|_| {
            Err(ApiError::Http {
                status: 500,
                message: "boom".to_string(),
            })
        });
        mock.expect_export_status().times(0);
        mock.expect_download_export().times(0);

        let (events, _rx) = event_channel();
        let mut coordinator = ExportCoordinator::new(&mock, events);
        let err = coordinator.run(&target()).await.unwrap_err();

        assert!(matches!(err, ExportError::Start(_)));
        assert!(err.to_string().contains("failed to start"));
        assert_eq!(coordinator.state(), ExportState::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_task_id_is_rejected_before_polling() {
        let mut mock = MockDashboardApi::new();
        mock.expect_start_export()
            .times(1)
            .returning(|_| Ok(String::new()));
        mock.expect_export_status().times(0);

        let (events, _rx) = event_channel();
        let mut coordinator = ExportCoordinator::new(&mock, events);
        let err = coordinator.run(&target()).await.unwrap_err();
        assert!(matches!(err, ExportError::EmptyTaskId));
    }

    #[tokio::test(start_paused = true)]
    async fn download_failure_is_terminal_and_not_retried() {
        let mut mock = MockDashboardApi::new();
        mock.expect_start_export()
            .times(1)
            .returning(|_| Ok("task3".to_string()));
        script_statuses(&mut mock, vec![ExportStatus::finished()]);
        mock.expect_download_export().times(1).returning(|_, _| {
            Err(ApiError::Http {
                status: 404,
                message: "gone".to_string(),
            })
        });

        let (events, _rx) = event_channel();
        let mut coordinator = ExportCoordinator::new(&mock, events);
        let err = coordinator.run(&target()).await.unwrap_err();
        assert!(matches!(err, ExportError::Download(_)));
        assert_eq!(coordinator.state(), ExportState::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn status_failure_stops_the_loop() {
        let mut mock = MockDashboardApi::new();
        mock.expect_start_export()
            .times(1)
            .returning(|_| Ok("task4".to_string()));
        mock.expect_export_status().times(1).returning(|_, _| {
            Err(ApiError::Http {
                status: 502,
                message: "bad gateway".to_string(),
            })
        });
        mock.expect_download_export().times(0);

        let (events, _rx) = event_channel();
        let mut coordinator = ExportCoordinator::new(&mock, events);
        let err = coordinator.run(&target()).await.unwrap_err();
        assert!(matches!(err, ExportError::Status(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn reported_progress_is_monotone_even_when_the_server_regresses() {
        let mut mock = MockDashboardApi::new();
        mock.expect_start_export()
            .times(1)
            .returning(|_| Ok("task5".to_string()));
        script_statuses(
            &mut mock,
            vec![
                ExportStatus::running(0),
                ExportStatus::running(10),
                ExportStatus::running(10),
                ExportStatus::running(55),
                // A restarted worker may briefly report less
                ExportStatus::running(30),
                ExportStatus::finished(),
            ],
        );
        mock.expect_download_export().times(1).returning(|_, _| {
            Ok(ExportDownload {
                bytes: Vec::new(),
                filename: None,
            })
        });

        let (events, mut rx) = event_channel();
        let mut coordinator = ExportCoordinator::new(&mock, events);
        coordinator.run(&target()).await.unwrap();

        let progress = drain_progress(&mut rx);
        assert_eq!(progress, vec![0, 10, 10, 55, 55, 100]);
        assert!(progress.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test(start_paused = true)]
    async fn progress_predicate_completes_without_done_flag() {
        let mut mock = MockDashboardApi::new();
        mock.expect_start_export()
            .times(1)
            .returning(|_| Ok("task6".to_string()));
        script_statuses(
            &mut mock,
            vec![
                ExportStatus {
                    done: None,
                    progress: Some(60),
                    error: None,
                },
                ExportStatus {
                    done: None,
                    progress: Some(100),
                    error: None,
                },
            ],
        );
        mock.expect_download_export().times(1).returning(|_, _| {
            Ok(ExportDownload {
                bytes: Vec::new(),
                filename: None,
            })
        });

        let target = ExportTarget::ZoneStatistics(crate::filters::StatisticsQuery {
            zone: crate::filters::Zone::Zone1,
            range: crate::filters::DateRange::today(),
        });
        let (events, _rx) = event_channel();
        let mut coordinator = ExportCoordinator::new(&mock, events);
        coordinator.run(&target).await.unwrap();
        assert_eq!(coordinator.state(), ExportState::Done);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_bounds_an_export_that_never_finishes() {
        let mut mock = MockDashboardApi::new();
        mock.expect_start_export()
            .times(1)
            .returning(|_| Ok("task7".to_string()));
        script_statuses(&mut mock, vec![ExportStatus::running(10)]);
        mock.expect_download_export().times(0);

        let (events, _rx) = event_channel();
        let options = PollOptions {
            deadline: Some(Duration::from_secs(5)),
            cancel: None,
        };
        let mut coordinator = ExportCoordinator::with_options(&mock, events, options);
        let err = coordinator.run(&target()).await.unwrap_err();
        assert!(matches!(err, ExportError::TimedOut(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_polling() {
        let mut mock = MockDashboardApi::new();
        mock.expect_start_export()
            .times(1)
            .returning(|_| Ok("task8".to_string()));
        mock.expect_export_status().times(0);
        mock.expect_download_export().times(0);

        let cancel = CancellationToken::new();
        cancel.cancel();
        let (events, _rx) = event_channel();
        let options = PollOptions {
            deadline: None,
            cancel: Some(cancel),
        };
        let mut coordinator = ExportCoordinator::with_options(&mock, events, options);
        let err = coordinator.run(&target()).await.unwrap_err();
        assert!(matches!(err, ExportError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn run_to_file_saves_with_fallback_name() {
        let mut mock = MockDashboardApi::new();
        mock.expect_start_export()
            .times(1)
            .returning(|_| Ok("task9".to_string()));
        script_statuses(&mut mock, vec![ExportStatus::finished()]);
        mock.expect_download_export().times(1).returning(|_, _| {
            Ok(ExportDownload {
                bytes: vec![1, 2, 3],
                filename: None,
            })
        });

        let dir = tempfile::tempdir().unwrap();
        let (events, _rx) = event_channel();
        let mut coordinator = ExportCoordinator::new(&mock, events);
        let path = coordinator
            .run_to_file(&target(), dir.path())
            .await
            .unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("Cell_Reports_"));
        assert!(name.ends_with(".xlsx"));
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
    }
}
