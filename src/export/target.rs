//! Export targets: one per dashboard variant that supports background
//! exports. A target bundles the variant's routes, start body, poll cadence,
//! and completion predicate, so the coordinator stays a single generic
//! machine.

use std::time::Duration;

use serde_json::Value;

use crate::consts::cli_consts::export_polling;
use crate::export::types::CompletionPredicate;
use crate::filters::{CellFilters, DateRange, ModuleFilters, StationFilters, StatisticsQuery};

#[derive(Debug, Clone)]
pub enum ExportTarget {
    /// Cell dashboard export (zone 1 cell reports).
    Cells(CellFilters),
    /// Module dashboard export.
    Modules(ModuleFilters),
    /// Zone02 station data export.
    Zone02(StationFilters),
    /// Combined statistics for one zone.
    ZoneStatistics(StatisticsQuery),
    /// Combined statistics across all zones.
    AllZoneStatistics(DateRange),
}

impl ExportTarget {
    /// Human-readable name used in progress messages.
    pub fn label(&self) -> &'static str {
        match self {
            ExportTarget::Cells(_) => "cell report",
            ExportTarget::Modules(_) => "module report",
            ExportTarget::Zone02(_) => "zone02 station data",
            ExportTarget::ZoneStatistics(_) => "zone statistics",
            ExportTarget::AllZoneStatistics(_) => "all-zones statistics",
        }
    }

    pub fn start_path(&self) -> &'static str {
        match self {
            ExportTarget::Cells(_) => "api/export",
            ExportTarget::Modules(_) => "api/module_export",
            ExportTarget::Zone02(_) => "export_excel_zone02",
            ExportTarget::ZoneStatistics(_) => "api/combined_statistics/export",
            ExportTarget::AllZoneStatistics(_) => "api/combined_statistics/export_all",
        }
    }

    pub fn status_path(&self) -> &'static str {
        match self {
            ExportTarget::Cells(_) => "api/export/status",
            ExportTarget::Modules(_) => "api/module_export/status",
            ExportTarget::Zone02(_) => "export_excel_zone02/status",
            ExportTarget::ZoneStatistics(_) => "api/combined_statistics/export/status",
            ExportTarget::AllZoneStatistics(_) => "api/combined_statistics/export_all/status",
        }
    }

    pub fn download_path(&self) -> &'static str {
        match self {
            ExportTarget::Cells(_) => "api/export/download",
            ExportTarget::Modules(_) => "api/module_export/download",
            ExportTarget::Zone02(_) => "export_excel_zone02/download",
            ExportTarget::ZoneStatistics(_) => "api/combined_statistics/export/download",
            ExportTarget::AllZoneStatistics(_) => "api/combined_statistics/export_all/download",
        }
    }

    /// Query pairs for the download call. The per-zone statistics download
    /// additionally names the zone being exported.
    pub fn download_query(&self, task_id: &str) -> Vec<(&'static str, String)> {
        let mut query = vec![("task_id", task_id.to_string())];
        if let ExportTarget::ZoneStatistics(stats) = self {
            query.push(("zone", stats.zone.to_string()));
        }
        query
    }

    /// The filter snapshot submitted as the start request's JSON body.
    pub fn body(&self) -> Value {
        let result = match self {
            ExportTarget::Cells(filters) => serde_json::to_value(filters),
            ExportTarget::Modules(filters) => serde_json::to_value(filters),
            ExportTarget::Zone02(filters) => serde_json::to_value(filters),
            ExportTarget::ZoneStatistics(query) => serde_json::to_value(query),
            ExportTarget::AllZoneStatistics(range) => serde_json::to_value(range),
        };
        // Filter structs serialize to plain string maps; this cannot fail.
        result.unwrap_or(Value::Null)
    }

    /// Fixed delay between status polls. Intentionally not unified across
    /// variants; each matches the cadence of the original dashboard page.
    pub fn poll_interval(&self) -> Duration {
        let ms = match self {
            ExportTarget::Cells(_) => export_polling::CELLS_INTERVAL_MS,
            ExportTarget::Modules(_) => export_polling::MODULES_INTERVAL_MS,
            ExportTarget::Zone02(_) => export_polling::ZONE02_INTERVAL_MS,
            ExportTarget::ZoneStatistics(_) => export_polling::ZONE_STATISTICS_INTERVAL_MS,
            ExportTarget::AllZoneStatistics(_) => export_polling::ALL_ZONES_INTERVAL_MS,
        };
        Duration::from_millis(ms)
    }

    /// How this variant's status endpoint signals completion. The per-zone
    /// statistics exporter predates the `done` flag and only reports
    /// progress.
    pub fn completion(&self) -> CompletionPredicate {
        match self {
            ExportTarget::ZoneStatistics(_) => CompletionPredicate::ProgressComplete,
            _ => CompletionPredicate::DoneFlag,
        }
    }

    /// Stem for the synthesized filename when the server does not name the
    /// file.
    pub fn filename_stem(&self) -> String {
        match self {
            ExportTarget::Cells(_) => "Cell_Reports".to_string(),
            ExportTarget::Modules(_) => "Module_Reports".to_string(),
            ExportTarget::Zone02(_) => "Zone02_Reports".to_string(),
            ExportTarget::ZoneStatistics(stats) => format!("{}_statistics", stats.zone),
            ExportTarget::AllZoneStatistics(_) => "all_zones_statistics".to_string(),
        }
    }
}
