//! A data source backed by JSON exports in one directory:
//!
//! | file | content |
//! |---|---|
//! | `activity_current.json` | `[ActivityRecord]` |
//! | `activity_previous.json` | `[ActivityRecord]` |
//! | `inventory.json` | `[InventoryRow]` |
//! | `stores.json` | `[StoreOwnership]` |
//! | `revision.txt` | optional revision tag |

use allot_core::{DataSource, Period};
use allot_types::{ActivityRecord, InventoryRow, StoreOwnership};
use anyhow::Context;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CURRENT_ACTIVITY_FILE: &str = "activity_current.json";
pub const PREVIOUS_ACTIVITY_FILE: &str = "activity_previous.json";
pub const INVENTORY_FILE: &str = "inventory.json";
pub const STORES_FILE: &str = "stores.json";
pub const REVISION_FILE: &str = "revision.txt";

#[derive(Debug, Clone)]
pub struct JsonFileSource {
    dir: PathBuf,
}

impl JsonFileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn read_json<T: DeserializeOwned>(&self, file: &str) -> anyhow::Result<T> {
        let path = self.dir.join(file);
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let value = serde_json::from_slice(&bytes)
            .with_context(|| format!("parsing {}", path.display()))?;
        debug!(file = %path.display(), bytes = bytes.len(), "Loaded data file");
        Ok(value)
    }
}

#[async_trait]
impl DataSource for JsonFileSource {
    fn name(&self) -> &str {
        "files"
    }

    async fn fetch_activity(&self, period: Period) -> anyhow::Result<Vec<ActivityRecord>> {
        match period {
            Period::Current => self.read_json(CURRENT_ACTIVITY_FILE).await,
            Period::Previous => self.read_json(PREVIOUS_ACTIVITY_FILE).await,
        }
    }

    async fn fetch_inventory(&self) -> anyhow::Result<Vec<InventoryRow>> {
        self.read_json(INVENTORY_FILE).await
    }

    async fn fetch_store_ownership(&self) -> anyhow::Result<Vec<StoreOwnership>> {
        self.read_json(STORES_FILE).await
    }

    async fn revision(&self) -> anyhow::Result<Option<String>> {
        let path = self.dir.join(REVISION_FILE);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => {
                let tag = text.trim();
                Ok((!tag.is_empty()).then(|| tag.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }
}
