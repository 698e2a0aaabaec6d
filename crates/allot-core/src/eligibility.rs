//! Target selection
//!
//! An agent takes part when it is individually selected, or when both its office
//! and its department are selected.

use allot_types::{Agent, Targets};
use std::collections::HashSet;
use tracing::debug;

/// Whether one agent is selected by the targets
pub fn is_targeted(agent: &Agent, targets: &Targets) -> bool {
    targets.agent_selected(&agent.agent_id)
        || (targets.office_selected(&agent.office)
            && targets.department_selected(&agent.department))
}

/// Select the targeted agents in roster order. Duplicate ids keep their first entry.
pub fn resolve_eligible(roster: &[Agent], targets: &Targets) -> Vec<Agent> {
    let mut seen: HashSet<String> = HashSet::new();
    let eligible: Vec<Agent> = roster
        .iter()
        .filter(|agent| is_targeted(agent, targets))
        .filter(|agent| seen.insert(agent.agent_id.clone()))
        .cloned()
        .collect();

    debug!(roster_size = roster.len(), targeted = eligible.len(), "Resolved targeted agents");
    eligible
}
