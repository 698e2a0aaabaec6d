//! Store attribution and the store-count filter
//!
//! Store ownership rows label agents the way whoever typed the sheet did:
//! `"Kim"`, `" kim "`, `"Kim (별도)"` are the same person. Labels are normalized
//! before matching so one agent is never split into several identities.

use crate::constants::names::{SUFFIX_CLOSERS, SUFFIX_OPENERS};
use allot_types::{Agent, AgentId, StoreOwnership};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Trim, drop a trailing parenthetical suffix and lowercase an agent label.
/// Brackets in the middle of a label are part of the name.
pub fn normalize_agent_label(label: &str) -> String {
    let trimmed = label.trim();
    let head = match trailing_group_start(trimmed) {
        Some(pos) => &trimmed[..pos],
        None => trimmed,
    };
    head.trim().to_lowercase()
}

/// Byte offset of the bracket group that closes at the very end of `label`
fn trailing_group_start(label: &str) -> Option<usize> {
    if !label.ends_with(SUFFIX_CLOSERS) {
        return None;
    }
    let mut depth = 0usize;
    for (pos, c) in label.char_indices().rev() {
        if SUFFIX_CLOSERS.contains(&c) {
            depth += 1;
        } else if SUFFIX_OPENERS.contains(&c) {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(pos);
            }
        }
    }
    None
}

/// Trim and lowercase a store name
pub fn normalize_store_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Normalized agent label → distinct normalized store names
#[derive(Debug, Clone, Default)]
pub struct StoreIndex {
    stores_by_agent: BTreeMap<String, BTreeSet<String>>,
}

impl StoreIndex {
    pub fn from_ownership(rows: &[StoreOwnership]) -> Self {
        let mut stores_by_agent: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for row in rows {
            let agent = normalize_agent_label(&row.agent_name);
            let store = normalize_store_name(&row.store_name);
            if agent.is_empty() || store.is_empty() {
                continue;
            }
            stores_by_agent.entry(agent).or_default().insert(store);
        }

        debug!(
            ownership_rows = rows.len(),
            agents = stores_by_agent.len(),
            "Built store attribution index"
        );
        Self { stores_by_agent }
    }

    /// Distinct stores attributed to the agent
    pub fn stores_of(&self, agent: &Agent) -> Option<&BTreeSet<String>> {
        self.stores_by_agent.get(&normalize_agent_label(&agent.display_name))
    }

    pub fn store_count(&self, agent: &Agent) -> u64 {
        self.stores_of(agent).map_or(0, |stores| stores.len() as u64)
    }

    /// Whether `store_name` (raw, as found on inventory rows) belongs to the agent
    pub fn owns_store(&self, agent: &Agent, store_name: &str) -> bool {
        self.stores_of(agent)
            .is_some_and(|stores| stores.contains(&normalize_store_name(store_name)))
    }
}

/// Agents split by whether they have at least one attributable store
#[derive(Debug, Clone, Default)]
pub struct StoreFilterOutcome {
    pub kept: Vec<Agent>,
    pub excluded: Vec<AgentId>,
}

/// Drop every agent without an attributable store. Order is preserved.
pub fn apply_store_filter(agents: Vec<Agent>, index: &StoreIndex) -> StoreFilterOutcome {
    let mut outcome = StoreFilterOutcome::default();
    for agent in agents {
        if index.store_count(&agent) == 0 {
            warn!(
                agent_id = %agent.agent_id,
                display_name = %agent.display_name,
                "Excluding agent with no attributable store"
            );
            outcome.excluded.push(agent.agent_id);
        } else {
            outcome.kept.push(agent);
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ownership(store: &str, agent: &str) -> StoreOwnership {
        StoreOwnership { store_name: store.to_string(), agent_name: agent.to_string() }
    }

    #[test]
    fn test_label_normalization() {
        assert_eq!(normalize_agent_label("  Kim Minsu "), "kim minsu");
        assert_eq!(normalize_agent_label("Kim Minsu (별도)"), "kim minsu");
        assert_eq!(normalize_agent_label("Kim Minsu（별도）"), "kim minsu");
        assert_eq!(normalize_agent_label("KIM MINSU(temp)"), "kim minsu");
        assert_eq!(normalize_agent_label("(별도)"), "");
        assert_eq!(normalize_agent_label("Kim (a (b))"), "kim");
    }

    #[test]
    fn test_inner_brackets_are_part_of_the_name() {
        assert_eq!(normalize_agent_label("Kim (A) Lee"), "kim (a) lee");
        assert_eq!(normalize_agent_label("Kim (A) Lee (별도)"), "kim (a) lee");
        assert_eq!(normalize_agent_label("Kim Lee)"), "kim lee)");

        let index = StoreIndex::from_ownership(&[
            ownership("S1", "Kim (A) Lee"),
            ownership("S2", "Kim"),
        ]);
        assert_eq!(index.store_count(&Agent::new("a1", "Kim", "Seoul", "Retail")), 1);
        assert_eq!(index.store_count(&Agent::new("a2", "Kim (A) Lee", "Seoul", "Retail")), 1);
    }

    #[test]
    fn test_label_variants_count_as_one_agent() {
        let index = StoreIndex::from_ownership(&[
            ownership("Gangnam 1", "Kim"),
            ownership("gangnam 1 ", "kim (별도)"),
            ownership("Jamsil", " KIM"),
            ownership("Haeundae", "Park"),
        ]);
        let kim = Agent::new("a1", "Kim", "Seoul", "Retail");
        let lee = Agent::new("a2", "Lee", "Seoul", "Retail");

        assert_eq!(index.store_count(&kim), 2);
        assert_eq!(index.store_count(&lee), 0);
        assert!(index.owns_store(&kim, "JAMSIL"));
        assert!(!index.owns_store(&kim, "Haeundae"));
    }

    #[test]
    fn test_filter_excludes_storeless_agents() {
        let index = StoreIndex::from_ownership(&[ownership("S1", "Kim")]);
        let outcome = apply_store_filter(
            vec![
                Agent::new("a1", "Kim", "Seoul", "Retail"),
                Agent::new("a2", "Lee", "Seoul", "Retail"),
            ],
            &index,
        );
        assert_eq!(outcome.kept.len(), 1);
        assert_eq!(outcome.kept[0].agent_id, "a1");
        assert_eq!(outcome.excluded, vec!["a2".to_string()]);
    }
}
