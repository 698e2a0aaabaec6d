//! External data collaborators
//!
//! Activity history, the inventory snapshot and store ownership come from outside
//! the engine. A run fetches all of them once, concurrently, and computes against
//! that one snapshot. Any fetch failure aborts the run before scoring starts.

use crate::error::{AllotError, AllotResult};
use allot_types::{ActivityRecord, InventoryRow, StoreOwnership};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{info, instrument};

/// Activity reporting period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Current,
    Previous,
}

impl Period {
    pub fn label(self) -> &'static str {
        match self {
            Period::Current => "activity.current",
            Period::Previous => "activity.previous",
        }
    }
}

/// A read-only provider of the figures the engine scores against.
/// Implementations own transport, authentication and retries.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Name used in logs and collaborator errors
    fn name(&self) -> &str;

    async fn fetch_activity(&self, period: Period) -> anyhow::Result<Vec<ActivityRecord>>;

    async fn fetch_inventory(&self) -> anyhow::Result<Vec<InventoryRow>>;

    async fn fetch_store_ownership(&self) -> anyhow::Result<Vec<StoreOwnership>>;

    /// Revision tag of the underlying data, when the source tracks one
    async fn revision(&self) -> anyhow::Result<Option<String>> {
        Ok(None)
    }
}

/// Everything one allocation run reads from collaborators
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSnapshot {
    #[serde(default)]
    pub current_activity: Vec<ActivityRecord>,
    #[serde(default)]
    pub previous_activity: Vec<ActivityRecord>,
    #[serde(default)]
    pub inventory: Vec<InventoryRow>,
    #[serde(default)]
    pub stores: Vec<StoreOwnership>,
    #[serde(default)]
    pub revision: Option<String>,
    #[serde(skip)]
    pub fetched_at: Option<DateTime<Utc>>,
}

impl DataSnapshot {
    /// Fetch every input concurrently and join them into one snapshot
    #[instrument(skip(source), fields(data_source = source.name()))]
    pub async fn gather(source: &dyn DataSource) -> AllotResult<Self> {
        let name = source.name();
        let (current_activity, previous_activity, inventory, stores, revision) = tokio::try_join!(
            fetch(name, Period::Current.label(), source.fetch_activity(Period::Current)),
            fetch(name, Period::Previous.label(), source.fetch_activity(Period::Previous)),
            fetch(name, "inventory", source.fetch_inventory()),
            fetch(name, "stores", source.fetch_store_ownership()),
            fetch(name, "revision", source.revision()),
        )?;

        info!(
            current_rows = current_activity.len(),
            previous_rows = previous_activity.len(),
            inventory_rows = inventory.len(),
            ownership_rows = stores.len(),
            revision = ?revision,
            "Gathered data snapshot"
        );

        Ok(Self {
            current_activity,
            previous_activity,
            inventory,
            stores,
            revision,
            fetched_at: Some(Utc::now()),
        })
    }

    /// Identity of the data this snapshot holds: the source revision when there is
    /// one, otherwise an md5 digest of the rows. `fetched_at` never contributes.
    pub fn data_tag(&self) -> AllotResult<String> {
        if let Some(revision) = &self.revision {
            return Ok(format!("rev:{revision}"));
        }
        let rows = serde_json::to_vec(self)
            .map_err(|e| AllotError::internal("snapshot", format!("cannot serialize snapshot: {e}")))?;
        Ok(format!("md5:{:x}", md5::compute(rows)))
    }

    /// Activity of both periods
    pub fn activity(&self) -> impl Iterator<Item = &ActivityRecord> {
        self.current_activity.iter().chain(self.previous_activity.iter())
    }
}

async fn fetch<T>(
    source: &str,
    what: &str,
    request: impl Future<Output = anyhow::Result<T>>,
) -> AllotResult<T> {
    request.await.map_err(|e| AllotError::collaborator(&format!("{source}/{what}"), &e))
}

/// A source serving a snapshot that is already in memory
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    snapshot: DataSnapshot,
}

impl StaticSource {
    pub fn new(snapshot: DataSnapshot) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl DataSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_activity(&self, period: Period) -> anyhow::Result<Vec<ActivityRecord>> {
        Ok(match period {
            Period::Current => self.snapshot.current_activity.clone(),
            Period::Previous => self.snapshot.previous_activity.clone(),
        })
    }

    async fn fetch_inventory(&self) -> anyhow::Result<Vec<InventoryRow>> {
        Ok(self.snapshot.inventory.clone())
    }

    async fn fetch_store_ownership(&self) -> anyhow::Result<Vec<StoreOwnership>> {
        Ok(self.snapshot.stores.clone())
    }

    async fn revision(&self) -> anyhow::Result<Option<String>> {
        Ok(self.snapshot.revision.clone())
    }
}
