//! Allot Types
//!
//! This crate defines the data model shared across the Allot workspace: the
//! caller-supplied snapshots the engine consumes (roster, settings, catalog,
//! activity, inventory, store ownership), the intermediate per-agent scores, and
//! the allocation result handed back to consumers.
//!
//! Every keyed collection is a `BTreeMap` so that serialized output is stable for
//! identical inputs.

#![warn(missing_docs)]

mod output;
mod types;

pub use output::{
    AgentModelAllocation, Allocation, ColorSummary, FactorBreakdown, FactorScore, GroupSummary,
    ModelSummary, WeightedAgent,
};
pub use types::{
    ActivityRecord, Agent, AgentId, AllocationRequest, AssignmentSettings, ColorVariant, InventoryRow,
    InventoryScaling, PhoneModel, Ratios, StockStatus, StoreOwnership, Targets,
};
