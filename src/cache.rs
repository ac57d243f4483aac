//! Raw-dataset cache and session lifecycle.
//!
//! A successful download overwrites a local copy of the CSV, so repeated
//! loads within a session skip the network. The file is an optimization
//! only: deleting it costs nothing but a re-download.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::fetch::{self, HttpClient};
use crate::parser;
use crate::table::EnergyTable;

/// Hourly energy balance per subsystem, ONS open-data bucket, year 2023.
pub const DATASET_URL: &str = "https://ons-aws-prod-opendata.s3.amazonaws.com/dataset/balanco_energia_subsistema_ho/BALANCO_ENERGIA_SUBSISTEMA_2023.csv";

/// Default local path for the cached raw CSV.
pub const DEFAULT_CACHE_PATH: &str = "dados.csv";

/// Where the raw dataset comes from and where its local copy lives.
///
/// The source may be an URL or a local CSV path; local sources are read
/// directly and never copied to the cache path.
#[derive(Debug, Clone)]
pub struct DatasetSource {
    source: String,
    cache_path: PathBuf,
}

impl Default for DatasetSource {
    fn default() -> Self {
        Self::new(DATASET_URL, DEFAULT_CACHE_PATH)
    }
}

impl DatasetSource {
    pub fn new(source: impl Into<String>, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            cache_path: cache_path.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    fn is_remote(&self) -> bool {
        self.source.starts_with("http")
    }

    /// Returns the raw CSV bytes, reading the local copy when present and
    /// fetching otherwise. `refresh` forces a download that overwrites
    /// the copy.
    pub async fn load_or_fetch<C: HttpClient>(&self, client: &C, refresh: bool) -> Result<Vec<u8>> {
        if self.is_remote() && !refresh && self.cache_path.exists() {
            debug!(path = %self.cache_path.display(), "Reading cached dataset");
            return std::fs::read(&self.cache_path)
                .with_context(|| format!("failed to read {}", self.cache_path.display()));
        }

        self.fetch(client).await
    }

    /// Downloads the dataset and overwrites the local copy.
    pub async fn fetch<C: HttpClient>(&self, client: &C) -> Result<Vec<u8>> {
        if !self.is_remote() {
            debug!(path = %self.source, "Reading dataset from local file");
            return std::fs::read(&self.source)
                .with_context(|| format!("failed to read {}", self.source));
        }

        info!(url = %self.source, "Downloading dataset");
        let bytes = fetch::fetch_bytes(client, &self.source).await?;

        // The bytes are already in hand; a failed cache write is not fatal.
        if let Err(e) = std::fs::write(&self.cache_path, &bytes) {
            warn!(path = %self.cache_path.display(), error = %e, "Failed to write dataset cache");
        }

        Ok(bytes)
    }
}

/// Memoized parsed table with an explicit lifecycle: fetched and parsed
/// on first access, reused until [`Session::reset`] or a forced
/// [`Session::refresh`]. Never implicitly re-fetched.
#[derive(Debug, Default)]
pub struct Session {
    source: DatasetSource,
    table: Option<EnergyTable>,
}

impl Session {
    pub fn new(source: DatasetSource) -> Self {
        Self {
            source,
            table: None,
        }
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    /// The parsed table, loading and parsing on first access.
    pub async fn table<C: HttpClient>(&mut self, client: &C) -> Result<&EnergyTable> {
        if self.table.is_none() {
            let bytes = self.source.load_or_fetch(client, false).await?;
            self.table = Some(parser::parse_table(&bytes)?);
        }

        Ok(self.table.as_ref().expect("table initialized above"))
    }

    /// Re-downloads the dataset, overwriting the local copy, and replaces
    /// the memoized table.
    pub async fn refresh<C: HttpClient>(&mut self, client: &C) -> Result<&EnergyTable> {
        let bytes = self.source.load_or_fetch(client, true).await?;
        self.table = Some(parser::parse_table(&bytes)?);

        Ok(self.table.as_ref().expect("table initialized above"))
    }

    /// Drops the memoized table; the next access loads and parses again.
    pub fn reset(&mut self) {
        self.table = None;
    }
}
