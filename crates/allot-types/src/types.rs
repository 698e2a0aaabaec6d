use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier of a sales agent as issued by the roster source.
pub type AgentId = String;

/// A sales agent taking part (or not) in an allocation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    /// Stable identifier
    pub agent_id: AgentId,
    /// Name as written on store ownership rows
    pub display_name: String,
    /// Office the agent reports to
    pub office: String,
    /// Department inside the office
    pub department: String,
    /// Free-form qualification tag
    #[serde(default)]
    pub qualification: String,
}

impl Agent {
    /// Convenience constructor used heavily by tests and fixtures
    #[must_use]
    pub fn new(
        agent_id: impl Into<String>,
        display_name: impl Into<String>,
        office: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            display_name: display_name.into(),
            office: office.into(),
            department: department.into(),
            qualification: String::new(),
        }
    }
}

/// One color of a catalog model together with the units to distribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorVariant {
    /// Color label, unique within its model
    pub color_name: String,
    /// Units of this model/color to distribute
    pub quantity: u64,
}

impl ColorVariant {
    /// Create a color variant
    #[must_use]
    pub fn new(color_name: impl Into<String>, quantity: u64) -> Self {
        Self { color_name: color_name.into(), quantity }
    }
}

/// A catalog item with its ordered color variants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneModel {
    /// Model name, unique within the catalog
    pub model_name: String,
    /// Colors in catalog order
    #[serde(default)]
    pub colors: Vec<ColorVariant>,
}

impl PhoneModel {
    /// Create a model from its name and colors
    #[must_use]
    pub fn new(model_name: impl Into<String>, colors: Vec<ColorVariant>) -> Self {
        Self { model_name: model_name.into(), colors }
    }

    /// Total units across every color of this model, saturating at `u64::MAX`
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.checked_total_quantity().unwrap_or(u64::MAX)
    }

    /// Total units across every color, or `None` when the sum overflows `u64`
    #[must_use]
    pub fn checked_total_quantity(&self) -> Option<u64> {
        self.colors.iter().try_fold(0u64, |total, c| total.checked_add(c.quantity))
    }
}

/// Relative shares of the four factors in the composite weight.
///
/// The values need not sum to 100; they are rescaled to shares of their total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ratios {
    /// Share of the turnover rate factor
    pub turnover_rate: f64,
    /// Share of the store count factor
    pub store_count: f64,
    /// Share of the inventory score factor
    pub remaining_inventory: f64,
    /// Share of the sales volume factor
    pub sales_volume: f64,
}

impl Default for Ratios {
    fn default() -> Self {
        Self { turnover_rate: 25.0, store_count: 25.0, remaining_inventory: 25.0, sales_volume: 25.0 }
    }
}

impl Ratios {
    /// Sum of all four shares
    #[must_use]
    pub fn total(&self) -> f64 {
        self.turnover_rate + self.store_count + self.remaining_inventory + self.sales_volume
    }

    /// Iterate `(name, value)` pairs in a fixed order
    #[must_use]
    pub fn entries(&self) -> [(&'static str, f64); 4] {
        [
            ("turnoverRate", self.turnover_rate),
            ("storeCount", self.store_count),
            ("remainingInventory", self.remaining_inventory),
            ("salesVolume", self.sales_volume),
        ]
    }

    /// Rescale the shares so they sum to 100. All-zero ratios stay all zero.
    #[must_use]
    pub fn as_percentages(&self) -> Self {
        let total = self.total();
        if total <= 0.0 {
            return Self {
                turnover_rate: 0.0,
                store_count: 0.0,
                remaining_inventory: 0.0,
                sales_volume: 0.0,
            };
        }
        let scale = 100.0 / total;
        Self {
            turnover_rate: self.turnover_rate * scale,
            store_count: self.store_count * scale,
            remaining_inventory: self.remaining_inventory * scale,
            sales_volume: self.sales_volume * scale,
        }
    }
}

/// Selection of offices, departments and individual agents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Targets {
    /// Office name → selected
    #[serde(default)]
    pub offices: BTreeMap<String, bool>,
    /// Department name → selected
    #[serde(default)]
    pub departments: BTreeMap<String, bool>,
    /// Agent id → selected
    #[serde(default)]
    pub agents: BTreeMap<AgentId, bool>,
}

impl Targets {
    /// Whether the office is switched on
    #[must_use]
    pub fn office_selected(&self, office: &str) -> bool {
        self.offices.get(office).copied().unwrap_or(false)
    }

    /// Whether the department is switched on
    #[must_use]
    pub fn department_selected(&self, department: &str) -> bool {
        self.departments.get(department).copied().unwrap_or(false)
    }

    /// Whether the agent is individually switched on
    #[must_use]
    pub fn agent_selected(&self, agent_id: &str) -> bool {
        self.agents.get(agent_id).copied().unwrap_or(false)
    }
}

/// How the inventory score factor is brought onto the 0–100 scale
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InventoryScaling {
    /// Linear min–max rescale across the eligible population
    #[default]
    MinMax,
    /// Clamp to [-50, 50] and shift onto [0, 100]
    Clamped,
}

/// Caller-supplied configuration of one allocation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentSettings {
    /// Factor shares
    #[serde(default)]
    pub ratios: Ratios,
    /// Participating offices, departments and agents
    #[serde(default)]
    pub targets: Targets,
    /// Inventory score normalization strategy
    #[serde(default)]
    pub inventory_scaling: InventoryScaling,
}

/// One row of opening (activation) activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    /// Agent credited with the activation
    pub agent_id: AgentId,
    /// Model activated
    pub model_name: String,
    /// Color, when the source records it
    #[serde(default)]
    pub color_name: Option<String>,
    /// Number of activations on this row
    pub activation_count: u64,
    /// Store where the activation happened
    #[serde(default)]
    pub store_name: String,
    /// Prepaid activations do not count towards sales volume
    #[serde(default)]
    pub is_prepaid: bool,
}

/// Stock condition reported by the inventory source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StockStatus {
    /// Sellable stock
    #[default]
    Normal,
    /// Held for a customer
    Reserved,
    /// Damaged or returned for repair
    Defective,
    /// Anything the source labels differently
    #[serde(other)]
    Other,
}

/// On-hand quantity of one model/color at one store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRow {
    /// Store holding the stock
    pub store_name: String,
    /// Model in stock
    pub model_name: String,
    /// Color, when the source records it
    #[serde(default)]
    pub color_name: Option<String>,
    /// Units on hand
    pub quantity: u64,
    /// Stock condition
    #[serde(default)]
    pub status: StockStatus,
}

/// Attribution of a client store to an agent label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreOwnership {
    /// Store name
    pub store_name: String,
    /// Agent label as written by the source, e.g. `"Kim (별도)"`
    pub agent_name: String,
}

/// Caller-supplied inputs of one allocation run. Activity, inventory and store
/// ownership are fetched separately from a data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRequest {
    /// Every agent that could take part
    #[serde(default)]
    pub roster: Vec<Agent>,
    /// Ratios, targets and scaling
    #[serde(default)]
    pub settings: AssignmentSettings,
    /// Models and color quantities to distribute
    #[serde(default)]
    pub catalog: Vec<PhoneModel>,
}
