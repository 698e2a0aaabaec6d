//! Proportional Allocator
//!
//! Distributes an integer `quantity` across weighted entries so that the parts
//! sum to exactly `quantity`:
//!
//! 1. base[i] = floor(weight[i] / total_weight * quantity), or 0 when the total
//!    weight is 0
//! 2. remainder = quantity - Σ base
//! 3. the remainder is dealt one unit at a time, round-robin, over the entries
//!    ordered by weight descending and key ascending
//!
//! Non-finite and negative weights count as 0. An empty entry list or a zero
//! quantity yields all zeros.

use std::cmp::Ordering;

/// Per-entry units plus the intermediate figures, for logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationOutcome {
    /// Units per entry, aligned with the input order
    pub units: Vec<u64>,
    /// Σ of the floor shares before remainder correction
    pub base_total: u64,
    /// Units dealt out by the round-robin pass
    pub remainder: u64,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ProportionalAllocator;

impl ProportionalAllocator {
    pub fn allocate<K: Ord>(&self, entries: &[(K, f64)], quantity: u64) -> AllocationOutcome {
        let n = entries.len();
        if n == 0 || quantity == 0 {
            return AllocationOutcome { units: vec![0; n], base_total: 0, remainder: 0 };
        }

        let weights: Vec<f64> = entries.iter().map(|(_, w)| sanitize(*w)).collect();
        let total_weight: f64 = weights.iter().sum();

        let mut units: Vec<u64> = if total_weight > 0.0 {
            weights
                .iter()
                .map(|w| (w / total_weight * quantity as f64).floor() as u64)
                .collect()
        } else {
            vec![0; n]
        };

        let order = priority_order(entries, &weights);

        // Float drift can push Σ floor one or two units past the quantity.
        // Summed in u128: near u64::MAX the drifted floors can overflow u64.
        let mut allocated: u128 = units.iter().map(|&u| u128::from(u)).sum();
        for &i in order.iter().rev() {
            if allocated <= u128::from(quantity) {
                break;
            }
            let excess = u64::try_from(allocated - u128::from(quantity)).unwrap_or(u64::MAX).min(units[i]);
            units[i] -= excess;
            allocated -= u128::from(excess);
        }

        let base_total = u64::try_from(allocated).unwrap_or(quantity);
        let remainder = quantity - base_total;
        if remainder > 0 {
            let rounds = remainder / n as u64;
            let extra = (remainder % n as u64) as usize;
            for (position, &i) in order.iter().enumerate() {
                units[i] += rounds + u64::from(position < extra);
            }
        }

        AllocationOutcome { units, base_total, remainder }
    }
}

fn sanitize(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 { weight } else { 0.0 }
}

/// Indices ordered by weight descending, then key ascending
fn priority_order<K: Ord>(entries: &[(K, f64)], weights: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..entries.len()).collect();
    order.sort_by(|&a, &b| match weights[b].total_cmp(&weights[a]) {
        Ordering::Equal => entries[a].0.cmp(&entries[b].0),
        other => other,
    });
    order
}
