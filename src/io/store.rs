//! Authorization store - read access to the allowed-plates list
//!
//! The store is consumed behind a trait so the orchestrator can be tested
//! against in-memory and failing implementations. The file-backed
//! implementation reads a JSON array of plate records; the file is opened,
//! parsed, and released per call, matching the low invocation rate of a
//! gate-access event. An empty list and a read failure are distinct
//! outcomes - the orchestrator fails closed on both.

use crate::domain::types::PlateRecord;
use crate::services::plate::normalize;
use anyhow::Context;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

/// Read interface over the authorization list
#[async_trait]
pub trait AuthorizationStore: Send + Sync {
    /// Load a snapshot of all plate records, in storage order
    async fn load_records(&self) -> anyhow::Result<Vec<PlateRecord>>;
}

/// File-backed store reading a JSON array of `PlateRecord`
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: &str) -> Self {
        Self { path: PathBuf::from(path) }
    }
}

#[async_trait]
impl AuthorizationStore for JsonFileStore {
    async fn load_records(&self) -> anyhow::Result<Vec<PlateRecord>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read plate store {}", self.path.display()))?;

        let records: Vec<PlateRecord> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse plate store {}", self.path.display()))?;

        // Stored codes are canonicalized the same way recognized plates
        // are, so a record entered as "b 1234 cd" still matches
        let records: Vec<PlateRecord> = records
            .into_iter()
            .map(|mut record| {
                record.code = normalize(&record.code).0;
                record
            })
            .collect();

        debug!(path = %self.path.display(), records = %records.len(), "plate_store_loaded");
        Ok(records)
    }
}
