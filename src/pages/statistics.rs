//! Combined statistics and grade suggestion views.
//!
//! Zone 1 statistics report cell/module counters; zones 2 and 3 report
//! per-station throughput. Grade suggestions return two binning analyses
//! (equal-width and k-means) over the rejected cells' voltages.

use serde::Deserialize;

use crate::api::{ApiError, DashboardApi};
use crate::filters::{DateRange, StatisticsQuery};
use crate::render;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CountSummary {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub ok: u64,
    #[serde(default)]
    pub ng: u64,
    #[serde(default)]
    pub inprogress: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StationSummary {
    #[serde(default)]
    pub station: String,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub ok: u64,
    #[serde(default)]
    pub ng: u64,
    /// Average cycle time in seconds.
    #[serde(default)]
    pub avgcytime: f64,
}

impl StationSummary {
    pub fn ok_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.ok as f64 * 100.0 / self.total as f64
        }
    }
}

/// One zone's statistics payload. Zone 1 fills `cells`/`modules`; zones 2
/// and 3 fill `stations`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ZoneStatistics {
    #[serde(default)]
    pub cells: Option<CountSummary>,
    #[serde(default)]
    pub modules: Option<CountSummary>,
    #[serde(default)]
    pub stations: Vec<StationSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GradeBin {
    pub grade_name: String,
    #[serde(default)]
    pub vmin: f64,
    #[serde(default)]
    pub vmax: f64,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BinningResult {
    #[serde(default)]
    pub grades: Vec<GradeBin>,
    #[serde(default)]
    pub total_cells: u64,
    #[serde(default)]
    pub accepted_count: u64,
    #[serde(default)]
    pub accepted_pct: f64,
    #[serde(default)]
    pub ignored_outliers_count: u64,
    /// Set when the analysis is unavailable server-side (e.g. the k-means
    /// backend is not installed).
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GradeSuggestions {
    #[serde(default)]
    pub equal_width: BinningResult,
    #[serde(default)]
    pub kmeans: BinningResult,
}

pub async fn show_statistics(
    api: &dyn DashboardApi,
    query: &StatisticsQuery,
) -> Result<(), ApiError> {
    let payload = api.combined_statistics(query).await?;

    if let Some(cells) = &payload.cells {
        render::summary(&[
            ("Total cells", cells.total),
            ("OK cells", cells.ok),
            ("NG cells", cells.ng),
        ]);
    }
    if let Some(modules) = &payload.modules {
        let mut entries = vec![
            ("Total modules", modules.total),
            ("OK modules", modules.ok),
            ("NG modules", modules.ng),
        ];
        if let Some(inprogress) = modules.inprogress {
            entries.push(("In progress", inprogress));
        }
        render::summary(&entries);
    }
    if !payload.stations.is_empty() {
        render::station_table(&payload.stations);
    }
    if payload.cells.is_none() && payload.modules.is_none() && payload.stations.is_empty() {
        println!("No data found for {} in this date range", query.zone);
    }
    Ok(())
}

pub async fn show_suggestions(api: &dyn DashboardApi, range: &DateRange) -> Result<(), ApiError> {
    let payload = api.grade_suggestions(range).await?;

    if payload.equal_width.total_cells == 0 {
        println!("No rejected cells found in the selected date range");
        return Ok(());
    }

    render::summary(&[
        ("Rejected cells", payload.equal_width.total_cells),
        (
            "Outliers removed",
            payload.equal_width.ignored_outliers_count,
        ),
    ]);
    render::binning_table("Equal-width binning", &payload.equal_width);
    render::binning_table("K-means clustering", &payload.kmeans);
    Ok(())
}
