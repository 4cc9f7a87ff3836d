//! Cell dashboard (zone 1 cell reports): paginated rows, aggregate counters,
//! and the grade/NG-reason breakdowns the dashboard charts are built from.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::api::{ApiError, DashboardApi};
use crate::filters::CellFilters;
use crate::pagination::{PageInfo, PageQuery};
use crate::render;

/// Column order of the cell report table.
pub const CELL_COLUMNS: [&str; 22] = [
    "RowNum",
    "Date_Time",
    "Shift",
    "Operator",
    "Cell_Position",
    "Cell_Barcode",
    "Cell_Barley_Paper_Positive",
    "Cell_Barley_Paper_Negative",
    "Cell_Barley_Paper_Status",
    "Cell_Capacity_Min_Set_Value",
    "Cell_Capacity_Max_Set_Value",
    "Cell_Capacity_Actual",
    "Cell_Capacity_Status",
    "Cell_Voltage_Min_Set_Value",
    "Cell_Voltage_Max_Set_Value",
    "Cell_Voltage_Actual",
    "Cell_Resistance_Min_Set_Value",
    "Cell_Resistance_Max_Set_Value",
    "Cell_Resistance_Actual",
    "Cell_Measurement_Status",
    "Cell_Final_Status",
    "Cell_Grade",
    // Cell_Fail_Reason would make 23; the server omits it for OK-only pages,
    // so it is appended dynamically when present.
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CellStats {
    #[serde(default, rename = "totalCells")]
    pub total_cells: u64,
    #[serde(default, rename = "okCells")]
    pub ok_cells: u64,
    #[serde(default, rename = "okCellsG1")]
    pub ok_cells_g1: u64,
    #[serde(default, rename = "okCellsG2")]
    pub ok_cells_g2: u64,
    #[serde(default, rename = "okCellsG3")]
    pub ok_cells_g3: u64,
    #[serde(default, rename = "okCellsG4")]
    pub ok_cells_g4: u64,
    #[serde(default, rename = "okCellsG5")]
    pub ok_cells_g5: u64,
    #[serde(default, rename = "okCellsG6")]
    pub ok_cells_g6: u64,
    #[serde(default, rename = "tngCells")]
    pub total_ng_cells: u64,
    #[serde(default, rename = "bngCells")]
    pub barcode_ng_cells: u64,
    #[serde(default, rename = "vngCells")]
    pub voltage_ng_cells: u64,
    #[serde(default, rename = "ingCells")]
    pub resistance_ng_cells: u64,
    #[serde(default, rename = "vingCells")]
    pub voltage_resistance_ng_cells: u64,
    #[serde(default, rename = "cngCells")]
    pub capacity_ng_cells: u64,
    #[serde(default, rename = "bpaperngCells")]
    pub barley_paper_ng_cells: u64,
    #[serde(default, rename = "dpngCells")]
    pub duplicate_ng_cells: u64,
}

impl CellStats {
    /// OK counts per gear grade, in chart order.
    pub fn ok_by_grade(&self) -> [(&'static str, u64); 6] {
        [
            ("Gear1", self.ok_cells_g1),
            ("Gear2", self.ok_cells_g2),
            ("Gear3", self.ok_cells_g3),
            ("Gear4", self.ok_cells_g4),
            ("Gear5", self.ok_cells_g5),
            ("Gear6", self.ok_cells_g6),
        ]
    }

    /// NG counts per rejection reason, in chart order.
    pub fn ng_by_reason(&self) -> [(&'static str, u64); 7] {
        [
            ("Barcode", self.barcode_ng_cells),
            ("Voltage", self.voltage_ng_cells),
            ("Resistance", self.resistance_ng_cells),
            ("Voltage & Resistance", self.voltage_resistance_ng_cells),
            ("Capacity", self.capacity_ng_cells),
            ("Barley Paper", self.barley_paper_ng_cells),
            ("Duplicate", self.duplicate_ng_cells),
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CellDashboardPage {
    #[serde(default)]
    pub stats: CellStats,
    #[serde(default)]
    pub rows: Vec<Map<String, Value>>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total: u64,
}

impl CellDashboardPage {
    pub fn page_info(&self) -> PageInfo {
        PageInfo::new(self.page, self.total_pages)
    }

    /// Table columns for this payload. `Cell_Fail_Reason` only appears on
    /// rows that carry it.
    pub fn columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = CELL_COLUMNS.iter().map(|c| c.to_string()).collect();
        if self
            .rows
            .iter()
            .any(|row| row.contains_key("Cell_Fail_Reason"))
        {
            columns.push("Cell_Fail_Reason".to_string());
        }
        columns
    }
}

/// Loads one cell dashboard page and prints the stats block, breakdowns,
/// table, and pagination footer.
pub async fn show(
    api: &dyn DashboardApi,
    filters: &CellFilters,
    page: PageQuery,
) -> Result<(), ApiError> {
    let payload = api.cell_dashboard(filters, page).await?;

    render::summary(&[
        ("Total cells", payload.stats.total_cells),
        ("OK cells", payload.stats.ok_cells),
        ("NG cells", payload.stats.total_ng_cells),
    ]);
    render::breakdown("OK cells per gear", &payload.stats.ok_by_grade());
    render::breakdown("NG cells per reason", &payload.stats.ng_by_reason());
    render::table(&payload.columns(), &payload.rows);
    render::page_footer(payload.page_info());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_deserialize_from_backend_field_names() {
        let payload: CellStats = serde_json::from_str(
            "{\"totalCells\": 120, \"okCells\": 100, \"okCellsG2\": 40, \"tngCells\": 20, \"vngCells\": 8}",
        )
        .unwrap();
        assert_eq!(payload.total_cells, 120);
        assert_eq!(payload.ok_cells_g2, 40);
        assert_eq!(payload.voltage_ng_cells, 8);
        // Omitted counters default to zero
        assert_eq!(payload.duplicate_ng_cells, 0);
    }

    #[test]
    fn fail_reason_column_is_conditional() {
        let mut row = Map::new();
        row.insert("Cell_Barcode".to_string(), Value::from("C1"));
        let page = CellDashboardPage {
            rows: vec![row],
            ..Default::default()
        };
        assert!(!page.columns().contains(&"Cell_Fail_Reason".to_string()));

        let mut row = Map::new();
        row.insert("Cell_Fail_Reason".to_string(), Value::from("Voltage"));
        let page = CellDashboardPage {
            rows: vec![row],
            ..Default::default()
        };
        assert!(page.columns().contains(&"Cell_Fail_Reason".to_string()));
    }

    #[test]
    fn breakdown_orders_match_dashboard_charts() {
        let stats = CellStats::default();
        assert_eq!(stats.ok_by_grade()[0].0, "Gear1");
        assert_eq!(stats.ng_by_reason()[3].0, "Voltage & Resistance");
    }
}
