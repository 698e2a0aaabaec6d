//! Roll-up of per-color allocations
//!
//! Pure summation and grouping. Nothing is renormalized here, so the exact-sum
//! property of every color carries over to models, agents, offices and
//! departments.

use allot_types::{
    Agent, AgentId, AgentModelAllocation, Allocation, ColorSummary, GroupSummary, ModelSummary,
    WeightedAgent,
};
use std::collections::BTreeMap;
use tracing::info;

/// The split of one color: `units[i]` belongs to `weights[i].agent_id`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorAllocation {
    pub color_name: String,
    pub quantity: u64,
    pub weights: Vec<WeightedAgent>,
    pub units: Vec<u64>,
}

impl ColorAllocation {
    pub fn assigned(&self) -> u64 {
        self.units.iter().sum()
    }
}

/// Every color split of one model, in catalog order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelAllocation {
    pub model_name: String,
    pub colors: Vec<ColorAllocation>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Aggregator;

impl Aggregator {
    /// Build the run result. Every eligible agent gets an entry for every model,
    /// even when it received nothing.
    pub fn aggregate(
        &self,
        eligible: &[Agent],
        models: &[ModelAllocation],
        excluded_agents: Vec<AgentId>,
    ) -> Allocation {
        let mut agents: BTreeMap<AgentId, BTreeMap<String, AgentModelAllocation>> = eligible
            .iter()
            .map(|agent| {
                let per_model = models
                    .iter()
                    .map(|model| (model.model_name.clone(), AgentModelAllocation::default()))
                    .collect();
                (agent.agent_id.clone(), per_model)
            })
            .collect();

        let mut summaries = BTreeMap::new();
        for model in models {
            let mut summary = ModelSummary::default();

            for color in &model.colors {
                let mut color_summary = ColorSummary {
                    quantity: color.quantity,
                    assigned_quantity: color.assigned(),
                    assignments: BTreeMap::new(),
                    weights: color.weights.clone(),
                };

                for (weighted, &units) in color.weights.iter().zip(&color.units) {
                    color_summary.assignments.insert(weighted.agent_id.clone(), units);
                    *summary.assignments.entry(weighted.agent_id.clone()).or_default() += units;

                    if let Some(entry) = agents
                        .get_mut(&weighted.agent_id)
                        .and_then(|per_model| per_model.get_mut(&model.model_name))
                    {
                        entry.quantity += units;
                        *entry.color_quantities.entry(color.color_name.clone()).or_default() +=
                            units;
                        entry.color_scores.insert(color.color_name.clone(), weighted.composite_score);
                    }
                }

                summary.total_quantity += color.quantity;
                summary.assigned_quantity += color_summary.assigned_quantity;
                summary.colors.insert(color.color_name.clone(), color_summary);
            }

            summaries.insert(model.model_name.clone(), summary);
        }

        for entry in agents.values_mut().flat_map(BTreeMap::values_mut) {
            entry.average_score = average(entry.color_scores.values().copied());
        }

        let mut offices: BTreeMap<String, GroupSummary> = BTreeMap::new();
        let mut departments: BTreeMap<String, GroupSummary> = BTreeMap::new();
        for agent in eligible {
            let total: u64 = agents
                .get(&agent.agent_id)
                .map(|per_model| per_model.values().map(|m| m.quantity).sum())
                .unwrap_or(0);
            for group in [
                offices.entry(agent.office.clone()).or_default(),
                departments.entry(agent.department.clone()).or_default(),
            ] {
                group.agent_count += 1;
                group.total_quantity += total;
                group.agents.push(agent.agent_id.clone());
            }
        }

        let allocated: u64 = summaries.values().map(|m| m.assigned_quantity).sum();
        info!(
            agents = agents.len(),
            models = summaries.len(),
            offices = offices.len(),
            departments = departments.len(),
            allocated_units = allocated,
            excluded = excluded_agents.len(),
            "Aggregated allocation"
        );

        Allocation { agents, offices, departments, models: summaries, excluded_agents }
    }
}

fn average(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0u32), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / f64::from(count) }
}
