#![allow(missing_docs)]
//! Core of the Allot inventory allocation engine.
//!
//! Given a roster of sales agents, per-run settings and a catalog of model/color
//! quantities, the engine splits every color quantity across the targeted agents
//! in proportion to a composite of four performance factors, and guarantees the
//! parts sum to exactly the requested quantity.

/// Roll-up of per-color splits into agent, model, office and department totals
pub mod aggregation;
/// TTL memo of raw factor scores
pub mod cache;
/// Engine configuration
pub mod config;
/// Engine-level constants
pub mod constants;
/// Target selection
pub mod eligibility;
/// Allocation engine entry points
pub mod engine;
/// Error types
pub mod error;
/// Raw factor scoring from the data snapshot
pub mod factors;
/// Population-relative normalization and composite weights
pub mod normalizer;
/// Data-source seam and the per-run snapshot
pub mod snapshot;
/// Store attribution and the store-count filter
pub mod store_filter;

pub use aggregation::{Aggregator, ColorAllocation, ModelAllocation};
pub use cache::{
    CacheStats, Clock, ColorScores, ManualClock, NoopScoreCache, ScoreCache, SystemClock,
    TtlScoreCache,
};
pub use config::{CacheConfig, EngineConfig};
pub use engine::AllocationEngine;
pub use error::{AllotError, AllotResult, ErrorSeverity};
pub use snapshot::{DataSnapshot, DataSource, Period, StaticSource};

pub use allot_types::*;
