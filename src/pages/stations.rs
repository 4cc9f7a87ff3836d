//! Zone02/zone03 station dashboards. These endpoints are POST-based, return
//! their column list alongside the rows (the column set depends on the
//! station table queried), and require a station name.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::api::{ApiError, DashboardApi};
use crate::filters::StationFilters;
use crate::pagination::{PageInfo, PageQuery};
use crate::render;

/// Which station zone to query. Zone02 and zone03 run the same page shape
/// against different databases and routes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StationZone {
    Zone02,
    Zone03,
}

impl StationZone {
    pub fn fetch_path(&self) -> &'static str {
        match self {
            StationZone::Zone02 => "fetch_data_zone02",
            StationZone::Zone03 => "fetch_data_zone03",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StationPage {
    #[serde(default)]
    pub data: Vec<Map<String, Value>>,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub total_ok: u64,
    #[serde(default)]
    pub total_ng: u64,
    /// Some station queries answer 200 with an error field instead of a
    /// proper status code.
    #[serde(default)]
    pub error: Option<String>,
}

impl StationPage {
    pub fn page_info(&self) -> PageInfo {
        PageInfo::new(self.page, self.pages)
    }

    /// Promotes an in-body error to a proper failure.
    pub fn into_result(self) -> Result<StationPage, ApiError> {
        match self.error {
            Some(message) => Err(ApiError::Http {
                status: 200,
                message,
            }),
            None => Ok(self),
        }
    }
}

pub async fn show(
    api: &dyn DashboardApi,
    zone: StationZone,
    filters: &StationFilters,
    page: PageQuery,
) -> Result<(), ApiError> {
    let payload = api.station_data(zone, filters, page).await?.into_result()?;

    render::summary(&[
        ("Total", payload.total),
        ("OK", payload.total_ok),
        ("NG", payload.total_ng),
    ]);
    render::table(&payload.columns, &payload.data);
    render::page_footer(payload.page_info());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_body_error_becomes_failure() {
        let page = StationPage {
            error: Some("station_name (table) is required".to_string()),
            ..Default::default()
        };
        let err = page.into_result().unwrap_err();
        assert!(err.to_string().contains("station_name"));
    }

    #[test]
    fn payload_with_columns_deserializes() {
        let payload: StationPage = serde_json::from_str(
            "{\"data\": [{\"Barcode\": \"B1\"}], \"columns\": [\"Barcode\"], \"page\": 1, \"pages\": 3, \"total\": 250, \"total_ok\": 240, \"total_ng\": 10}",
        )
        .unwrap();
        assert_eq!(payload.columns, vec!["Barcode"]);
        assert_eq!(payload.page_info(), PageInfo::new(1, 3));
        assert!(payload.into_result().is_ok());
    }
}
