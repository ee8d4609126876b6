//! Where the sales dataset comes from.
//!
//! Resolution order for the source:
//! - `--data <file.csv>` or `--url <url>` on the command line
//! - `SALES_DATA_URL` from the environment (a `.env` file is honoured)
//! - the public historical automobile sales CSV

use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use tracing::info;

use crate::error::AppError;
use crate::io::ingest::{IngestedData, load_sales_csv, load_sales_csv_path};

pub const DEFAULT_DATA_URL: &str = "https://cf-courses-data.s3.us.cloud-object-storage.appdomain.cloud/IBMDeveloperSkillsNetwork-DV0101EN-SkillsNetwork/Data%20Files/historical_automobile_sales.csv";

/// Environment variable overriding the default dataset URL.
pub const DATA_URL_ENV: &str = "SALES_DATA_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// Pick the source from CLI flags, then the environment, then the default URL.
    pub fn resolve(file: Option<&Path>, url: Option<&str>) -> Result<Self, AppError> {
        if let Some(path) = file {
            return Ok(DataSource::File(validate_csv_path(path)?));
        }
        if let Some(url) = url {
            return Ok(DataSource::Url(url.to_string()));
        }

        dotenvy::dotenv().ok();
        match std::env::var(DATA_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Ok(DataSource::Url(url.trim().to_string())),
            _ => Ok(DataSource::Url(DEFAULT_DATA_URL.to_string())),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            DataSource::File(path) => path.display().to_string(),
            DataSource::Url(url) => url.clone(),
        }
    }

    /// Fetch (if remote) and ingest the dataset.
    pub fn load(&self) -> Result<IngestedData, AppError> {
        match self {
            DataSource::File(path) => load_sales_csv_path(path),
            DataSource::Url(url) => {
                let body = DatasetClient::new().fetch_csv(url)?;
                let data = load_sales_csv(body.as_bytes())?;
                info!(url = %url, rows = data.rows_read, "loaded dataset from url");
                Ok(data)
            }
        }
    }
}

/// Thin blocking HTTP client for the published CSV.
pub struct DatasetClient {
    client: Client,
}

impl DatasetClient {
    pub fn new() -> Self {
        Self { client: Client::new() }
    }

    pub fn fetch_csv(&self, url: &str) -> Result<String, AppError> {
        info!(url = %url, "fetching dataset");
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| AppError::new(4, format!("Dataset request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Dataset request failed with status {}.", resp.status()),
            ));
        }

        resp.text()
            .map_err(|e| AppError::new(4, format!("Failed to read dataset response: {e}")))
    }
}

impl Default for DatasetClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate the provided path points to a `.csv` file.
pub fn validate_csv_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::new(
            2,
            format!("CSV file not found: {}", path.display()),
        ));
    }
    if path.is_dir() {
        return Err(AppError::new(
            2,
            format!("Expected a file, got a directory: {}", path.display()),
        ));
    }
    if path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        != Some(true)
    {
        return Err(AppError::new(
            2,
            format!("Expected a .csv file (got: {}).", path.display()),
        ));
    }

    Ok(path.to_path_buf())
}
