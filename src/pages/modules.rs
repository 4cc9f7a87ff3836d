//! Module dashboard (zone 1 module formation reports): one row per
//! module/cell pairing, with capacity/voltage/resistance aggregates joined
//! from the latest cell measurements.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::api::{ApiError, DashboardApi};
use crate::filters::ModuleFilters;
use crate::pagination::{PageInfo, PageQuery};
use crate::render;

/// Column order of the expanded module report table.
pub const MODULE_COLUMNS: [&str; 18] = [
    "SrNo",
    "Date_Time",
    "Shift",
    "Operator",
    "Module_Type",
    "Module_Grade",
    "Module_ID",
    "Cell_ID",
    "CapacityMinimum",
    "CapacityMaximum",
    "CapacityName",
    "Status",
    "Min_Capacity",
    "Max_Capacity",
    "Min_Voltage",
    "Max_Voltage",
    "Min_Resistance",
    "Max_Resistance",
];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModuleDashboardPage {
    #[serde(default)]
    pub rows: Vec<Map<String, Value>>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_module: u64,
    #[serde(default)]
    pub total_ok: u64,
    #[serde(default)]
    pub total_ng: u64,
    #[serde(default)]
    pub total_inprogress: u64,
}

impl ModuleDashboardPage {
    pub fn page_info(&self) -> PageInfo {
        PageInfo::new(self.page, self.total_pages)
    }
}

pub async fn show(
    api: &dyn DashboardApi,
    filters: &ModuleFilters,
    page: PageQuery,
) -> Result<(), ApiError> {
    let payload = api.module_dashboard(filters, page).await?;

    render::summary(&[
        ("Total modules", payload.total_module),
        ("OK", payload.total_ok),
        ("NG", payload.total_ng),
        ("In progress", payload.total_inprogress),
    ]);
    let columns: Vec<String> = MODULE_COLUMNS.iter().map(|c| c.to_string()).collect();
    render::table(&columns, &payload.rows);
    render::page_footer(payload.page_info());
    Ok(())
}
