//! Quality-system API seam.
//!
//! The trait abstracts the REST backend so the export coordinator and page
//! loaders can be exercised against scripted responses in tests.

use crate::export::target::ExportTarget;
use crate::export::types::{ExportDownload, ExportStatus};
use crate::filters::{CellFilters, DateRange, ModuleFilters, StationFilters, StatisticsQuery};
use crate::pages::cells::CellDashboardPage;
use crate::pages::modules::ModuleDashboardPage;
use crate::pages::stations::{StationPage, StationZone};
use crate::pages::statistics::{GradeSuggestions, ZoneStatistics};
use crate::pagination::PageQuery;

pub(crate) mod client;
pub use client::ApiClient;
pub mod error;
pub use error::ApiError;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait DashboardApi: Send + Sync {
    /// Loads one page of cell reports plus aggregate statistics.
    async fn cell_dashboard(
        &self,
        filters: &CellFilters,
        page: PageQuery,
    ) -> Result<CellDashboardPage, ApiError>;

    /// Loads one page of expanded module reports plus summary counters.
    async fn module_dashboard(
        &self,
        filters: &ModuleFilters,
        page: PageQuery,
    ) -> Result<ModuleDashboardPage, ApiError>;

    /// Loads one page of station data for zone02 or zone03.
    async fn station_data(
        &self,
        zone: StationZone,
        filters: &StationFilters,
        page: PageQuery,
    ) -> Result<StationPage, ApiError>;

    /// Loads combined statistics for one zone.
    async fn combined_statistics(
        &self,
        query: &StatisticsQuery,
    ) -> Result<ZoneStatistics, ApiError>;

    /// Runs the grade-suggestion analyses over rejected cells in a range.
    async fn grade_suggestions(&self, range: &DateRange)
        -> Result<GradeSuggestions, ApiError>;

    /// Starts a background export job. Returns the job's task id.
    async fn start_export(&self, target: &ExportTarget) -> Result<String, ApiError>;

    /// Checks the status of a background export job.
    async fn export_status(
        &self,
        target: &ExportTarget,
        task_id: &str,
    ) -> Result<ExportStatus, ApiError>;

    /// Downloads a finished export.
    async fn download_export(
        &self,
        target: &ExportTarget,
        task_id: &str,
    ) -> Result<ExportDownload, ApiError>;

    /// Zone03's synchronous export: the response body is the workbook.
    async fn export_station_sheet(
        &self,
        filters: &StationFilters,
    ) -> Result<ExportDownload, ApiError>;
}
