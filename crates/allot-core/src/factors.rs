//! Raw factor scoring
//!
//! For one agent and one model (optionally narrowed to a color) the calculator
//! derives sales volume, remaining inventory, turnover rate, store count and the
//! inventory score from the run's data snapshot.

use crate::snapshot::DataSnapshot;
use crate::store_filter::StoreIndex;
use allot_calculator::TurnoverRateCalculator;
use allot_calculator::constants::scores::NEUTRAL_SCORE;
use allot_types::{ActivityRecord, Agent, FactorScore, InventoryRow, StockStatus};
use std::collections::HashMap;

/// Borrowed indices over one snapshot; cheap to share across worker threads
#[derive(Debug)]
pub struct FactorCalculator<'a> {
    /// agent id → model name → activity rows of both periods
    activity: HashMap<&'a str, HashMap<&'a str, Vec<&'a ActivityRecord>>>,
    /// model name → inventory rows
    inventory: HashMap<&'a str, Vec<&'a InventoryRow>>,
    stores: &'a StoreIndex,
    turnover: TurnoverRateCalculator,
}

impl<'a> FactorCalculator<'a> {
    pub fn new(snapshot: &'a DataSnapshot, stores: &'a StoreIndex) -> Self {
        let mut activity: HashMap<&'a str, HashMap<&'a str, Vec<&'a ActivityRecord>>> =
            HashMap::new();
        for record in snapshot.activity() {
            activity
                .entry(record.agent_id.as_str())
                .or_default()
                .entry(record.model_name.as_str())
                .or_default()
                .push(record);
        }

        let mut inventory: HashMap<&'a str, Vec<&'a InventoryRow>> = HashMap::new();
        for row in &snapshot.inventory {
            inventory.entry(row.model_name.as_str()).or_default().push(row);
        }

        Self { activity, inventory, stores, turnover: TurnoverRateCalculator }
    }

    /// Raw factors of one agent. `color = None` scores the whole model.
    pub fn score(&self, agent: &Agent, model_name: &str, color: Option<&str>) -> FactorScore {
        let records = self
            .activity
            .get(agent.agent_id.as_str())
            .and_then(|by_model| by_model.get(model_name))
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut has_activity = false;
        let mut sales_volume: u64 = 0;
        for record in records.iter().filter(|r| color_matches(r.color_name.as_deref(), color)) {
            has_activity = true;
            if !record.is_prepaid {
                sales_volume = sales_volume.saturating_add(record.activation_count);
            }
        }

        let mut has_inventory = false;
        let mut remaining_inventory: u64 = 0;
        let rows = self.inventory.get(model_name).map(Vec::as_slice).unwrap_or_default();
        for row in rows.iter().filter(|r| {
            color_matches(r.color_name.as_deref(), color) && self.stores.owns_store(agent, &r.store_name)
        }) {
            has_inventory = true;
            if row.status == StockStatus::Normal {
                remaining_inventory = remaining_inventory.saturating_add(row.quantity);
            }
        }

        let store_count = self.stores.store_count(agent);

        if !has_activity && !has_inventory {
            return FactorScore {
                agent_id: agent.agent_id.clone(),
                sales_volume: 0,
                remaining_inventory: 0,
                turnover_rate: NEUTRAL_SCORE,
                store_count,
                inventory_score: 0,
                data_sparse: true,
            };
        }

        FactorScore {
            agent_id: agent.agent_id.clone(),
            sales_volume,
            remaining_inventory,
            turnover_rate: self.turnover.calculate(sales_volume, remaining_inventory),
            store_count,
            inventory_score: signed(sales_volume).saturating_sub(signed(remaining_inventory)),
            data_sparse: false,
        }
    }

    /// Score every agent, ordered by agent id
    pub fn score_all(
        &self,
        agents: &[Agent],
        model_name: &str,
        color: Option<&str>,
    ) -> Vec<FactorScore> {
        let mut scores: Vec<FactorScore> =
            agents.iter().map(|agent| self.score(agent, model_name, color)).collect();
        scores.sort_by(|a, b| a.agent_id.cmp(&b.agent_id));
        scores
    }
}

/// `wanted = None` accepts every row; otherwise the row must carry the same color
fn color_matches(row_color: Option<&str>, wanted: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(wanted) => row_color.is_some_and(|c| c.trim() == wanted.trim()),
    }
}

fn signed(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
