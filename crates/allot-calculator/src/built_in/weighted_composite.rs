//! A calculator combining the four normalized factors into one weight.

use crate::constants::scores::SCORE_SCALE;
use allot_types::{FactorBreakdown, Ratios};

/// Composite of one agent for one model/color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeScore {
    /// Weighted mean of the factors, 0–100
    pub score: f64,
    /// `score / 100`, clamped to `[0, 1]`
    pub weight: f64,
}

/// Calculates the ratio-weighted composite of a factor breakdown.
///
/// # Expected Inputs
/// - `ratios`: factor shares; rescaled so they sum to 100 before use.
/// - `breakdown`: every factor already on the 0–100 scale.
///
/// # Output
/// `Σ(share_f * factor_f) / 100` as the score and the same divided by 100 as the
/// weight. All-zero ratios produce a zero composite.
#[derive(Debug, Default, Clone, Copy)]
pub struct WeightedCompositeCalculator;

impl WeightedCompositeCalculator {
    pub fn new() -> Self {
        Self
    }

    pub fn calculate(&self, ratios: &Ratios, breakdown: &FactorBreakdown) -> CompositeScore {
        let shares = ratios.as_percentages();

        let weighted = shares.turnover_rate * breakdown.turnover_rate
            + shares.store_count * breakdown.store_count
            + shares.remaining_inventory * breakdown.inventory_score
            + shares.sales_volume * breakdown.sales_volume;

        let score = weighted / SCORE_SCALE;
        if !score.is_finite() {
            return CompositeScore { score: 0.0, weight: 0.0 };
        }

        let score = score.clamp(0.0, SCORE_SCALE);
        CompositeScore { score, weight: (score / SCORE_SCALE).clamp(0.0, 1.0) }
    }
}
