//! Quality-system REST client.
//!
//! A thin reqwest wrapper for the dashboard and export endpoints. All
//! requests share one client; downloads get a longer per-request timeout.

use std::io::Read;
use std::time::Duration;

use flate2::read::GzDecoder;
use reqwest::{Client, ClientBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::api::{ApiError, DashboardApi};
use crate::consts::cli_consts::{CONNECT_TIMEOUT_SECS, DOWNLOAD_TIMEOUT_SECS, REQUEST_TIMEOUT_SECS};
use crate::environment::Environment;
use crate::export::download::filename_from_disposition;
use crate::export::target::ExportTarget;
use crate::export::types::{ExportDownload, ExportStatus};
use crate::filters::{CellFilters, DateRange, ModuleFilters, StationFilters, StatisticsQuery};
use crate::pages::cells::CellDashboardPage;
use crate::pages::modules::ModuleDashboardPage;
use crate::pages::stations::{StationPage, StationZone};
use crate::pages::statistics::{GradeSuggestions, ZoneStatistics};
use crate::pagination::PageQuery;

// User-Agent string with CLI version
const USER_AGENT: &str = concat!("cellquality-cli/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct StartExportResponse {
    task_id: String,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    environment: Environment,
}

impl ApiClient {
    pub fn new(environment: Environment) -> Self {
        Self {
            client: ClientBuilder::new()
                .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to create HTTP client"),
            environment,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.environment.base_url().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    async fn handle_response_status(response: Response) -> Result<Response, ApiError> {
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        Ok(response)
    }

    /// Decodes a JSON body. The server compresses large payloads when the
    /// request advertises gzip, marking them with `Content-Encoding`.
    async fn decode_body<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let gzipped = response
            .headers()
            .get(reqwest::header::CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|enc| enc.contains("gzip"));
        let bytes = response.bytes().await?;
        Self::decode_slice(gzipped, &bytes)
    }

    fn decode_slice<T: DeserializeOwned>(gzipped: bool, bytes: &[u8]) -> Result<T, ApiError> {
        if gzipped {
            let mut text = String::new();
            GzDecoder::new(bytes)
                .read_to_string(&mut text)
                .map_err(|e| ApiError::Http {
                    status: 200,
                    message: format!("Failed to decompress response: {}", e),
                })?;
            Ok(serde_json::from_str(&text)?)
        } else {
            Ok(serde_json::from_slice(bytes)?)
        }
    }

    async fn get_request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.build_url(endpoint);
        let response = self
            .client
            .get(&url)
            .query(query)
            .header("User-Agent", USER_AGENT)
            .header(reqwest::header::ACCEPT_ENCODING, "gzip")
            .send()
            .await?;

        let response = Self::handle_response_status(response).await?;
        Self::decode_body(response).await
    }

    async fn post_request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &Value,
    ) -> Result<T, ApiError> {
        let url = self.build_url(endpoint);
        let response = self
            .client
            .post(&url)
            .header("User-Agent", USER_AGENT)
            .header(reqwest::header::ACCEPT_ENCODING, "gzip")
            .json(body)
            .send()
            .await?;

        let response = Self::handle_response_status(response).await?;
        Self::decode_body(response).await
    }

    /// Fetches a binary payload, keeping the server-provided filename when
    /// the Content-Disposition header carries one.
    async fn read_download(response: Response) -> Result<ExportDownload, ApiError> {
        let response = Self::handle_response_status(response).await?;
        let filename = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition);
        let bytes = response.bytes().await?.to_vec();
        Ok(ExportDownload { bytes, filename })
    }
}

#[async_trait::async_trait]
impl DashboardApi for ApiClient {
    async fn cell_dashboard(
        &self,
        filters: &CellFilters,
        page: PageQuery,
    ) -> Result<CellDashboardPage, ApiError> {
        let mut query = filters.to_query();
        query.push(("page", page.page.to_string()));
        query.push(("page_size", page.page_size.to_string()));
        self.get_request("api/cell_dashboard", &query).await
    }

    async fn module_dashboard(
        &self,
        filters: &ModuleFilters,
        page: PageQuery,
    ) -> Result<ModuleDashboardPage, ApiError> {
        let mut query = filters.to_query();
        query.push(("page", page.page.to_string()));
        query.push(("page_size", page.page_size.to_string()));
        self.get_request("api/module_dashboard", &query).await
    }

    async fn station_data(
        &self,
        zone: StationZone,
        filters: &StationFilters,
        page: PageQuery,
    ) -> Result<StationPage, ApiError> {
        let mut body = serde_json::to_value(filters)?;
        if let Value::Object(map) = &mut body {
            map.insert("page".to_string(), json!(page.page));
            map.insert("limit".to_string(), json!(page.page_size));
        }
        self.post_request(zone.fetch_path(), &body).await
    }

    async fn combined_statistics(
        &self,
        query: &StatisticsQuery,
    ) -> Result<ZoneStatistics, ApiError> {
        let body = serde_json::to_value(query)?;
        self.post_request("api/combined_statistics", &body).await
    }

    async fn grade_suggestions(
        &self,
        range: &DateRange,
    ) -> Result<GradeSuggestions, ApiError> {
        let body = serde_json::to_value(range)?;
        self.post_request("api/grade_suggestions", &body).await
    }

    async fn start_export(&self, target: &ExportTarget) -> Result<String, ApiError> {
        let response: StartExportResponse = self
            .post_request(target.start_path(), &target.body())
            .await?;
        Ok(response.task_id)
    }

    async fn export_status(
        &self,
        target: &ExportTarget,
        task_id: &str,
    ) -> Result<ExportStatus, ApiError> {
        let query = [("task_id", task_id.to_string())];
        self.get_request(target.status_path(), &query).await
    }

    async fn download_export(
        &self,
        target: &ExportTarget,
        task_id: &str,
    ) -> Result<ExportDownload, ApiError> {
        let url = self.build_url(target.download_path());
        let response = self
            .client
            .get(&url)
            .query(&target.download_query(task_id))
            .header("User-Agent", USER_AGENT)
            .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
            .send()
            .await?;
        Self::read_download(response).await
    }

    async fn export_station_sheet(
        &self,
        filters: &StationFilters,
    ) -> Result<ExportDownload, ApiError> {
        let url = self.build_url("export_excel_zone03");
        let body = serde_json::to_value(filters)?;
        let response = self
            .client
            .post(&url)
            .header("User-Agent", USER_AGENT)
            .json(&body)
            .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
            .send()
            .await?;
        Self::read_download(response).await
    }
}
