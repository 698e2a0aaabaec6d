use crate::types::AgentId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw indicators of one agent for one model (and optionally one color)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorScore {
    /// Agent the indicators belong to
    pub agent_id: AgentId,
    /// Non-prepaid activations across the current and previous period
    pub sales_volume: u64,
    /// Normal-status units on hand at the agent's stores
    pub remaining_inventory: u64,
    /// `sales / (inventory + sales) * 100`, or the neutral score for data-sparse agents
    pub turnover_rate: f64,
    /// Distinct stores attributed to the agent
    pub store_count: u64,
    /// `sales_volume - remaining_inventory`
    pub inventory_score: i64,
    /// No activity and no inventory rows matched this agent
    #[serde(default)]
    pub data_sparse: bool,
}

/// Factor values after relative normalization, each on a 0–100 scale
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorBreakdown {
    /// Turnover rate, used as-is
    pub turnover_rate: f64,
    /// Store count relative to the population maximum
    pub store_count: f64,
    /// Inventory score rescaled across the population
    pub inventory_score: f64,
    /// Sales volume relative to the population maximum
    pub sales_volume: f64,
}

/// An agent with its composite weight for one model/color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedAgent {
    /// Agent identifier
    pub agent_id: AgentId,
    /// Composite weight in `[0, 1]`, input to the allocator
    pub weight: f64,
    /// Composite score on the 0–100 scale
    pub composite_score: f64,
    /// Normalized factors that produced the composite
    pub breakdown: FactorBreakdown,
}

/// What one agent receives of one model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentModelAllocation {
    /// Units across every color
    pub quantity: u64,
    /// Units per color
    pub color_quantities: BTreeMap<String, u64>,
    /// Composite score (0–100) per color
    pub color_scores: BTreeMap<String, f64>,
    /// Mean of `color_scores`
    pub average_score: f64,
}

/// Roll-up of an office or department
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    /// Eligible agents in the group
    pub agent_count: usize,
    /// Units allocated to the group across all models
    pub total_quantity: u64,
    /// Member agent ids in roster order
    pub agents: Vec<AgentId>,
}

/// Allocation of one color of one model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorSummary {
    /// Units requested for this color
    pub quantity: u64,
    /// Units handed out; equals `quantity` whenever an eligible agent exists
    pub assigned_quantity: u64,
    /// Agent id → units
    pub assignments: BTreeMap<AgentId, u64>,
    /// Weights that produced the split
    pub weights: Vec<WeightedAgent>,
}

/// Allocation of one model across its colors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSummary {
    /// Units requested across every color
    pub total_quantity: u64,
    /// Units handed out across every color
    pub assigned_quantity: u64,
    /// Agent id → units across every color
    pub assignments: BTreeMap<AgentId, u64>,
    /// Color name → per-color allocation
    pub colors: BTreeMap<String, ColorSummary>,
}

/// Result of an allocation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    /// Agent id → model name → allocation
    #[serde(default)]
    pub agents: BTreeMap<AgentId, BTreeMap<String, AgentModelAllocation>>,
    /// Office name → roll-up
    #[serde(default)]
    pub offices: BTreeMap<String, GroupSummary>,
    /// Department name → roll-up
    #[serde(default)]
    pub departments: BTreeMap<String, GroupSummary>,
    /// Model name → roll-up
    #[serde(default)]
    pub models: BTreeMap<String, ModelSummary>,
    /// Targeted agents dropped for having no attributable store
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_agents: Vec<AgentId>,
}

impl Allocation {
    /// True when nothing was allocated to anyone
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty() && self.models.is_empty()
    }

    /// Units one agent received of one model and color, if the agent participated
    #[must_use]
    pub fn quantity_for(&self, agent_id: &str, model_name: &str, color_name: &str) -> Option<u64> {
        self.models
            .get(model_name)
            .and_then(|m| m.colors.get(color_name))
            .and_then(|c| c.assignments.get(agent_id))
            .copied()
    }

    /// Units one agent received across every model
    #[must_use]
    pub fn agent_total(&self, agent_id: &str) -> u64 {
        self.agents
            .get(agent_id)
            .map(|models| models.values().map(|m| m.quantity).sum())
            .unwrap_or(0)
    }
}
