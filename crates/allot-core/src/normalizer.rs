//! Relative normalization
//!
//! Raw sales and inventory magnitudes differ by region and season, so factors are
//! compared only within the population being allocated to:
//!
//! * sales volume and store count: share of the population maximum
//! * inventory score: min–max (or clamped, per settings) across the population
//! * turnover rate: already a percentage, used as-is
//!
//! Data-sparse agents get the neutral score on sales and inventory and are left
//! out of the population statistics, so they neither gain nor cost anyone else.

use allot_calculator::constants::scores::NEUTRAL_SCORE;
use allot_calculator::{MaxRelativeScaler, Scaler, WeightedCompositeCalculator, inventory_scaler};
use allot_types::{AssignmentSettings, FactorBreakdown, FactorScore, WeightedAgent};

/// Turn raw scores of one model/color into composite weights, in input order
pub fn normalize(scores: &[FactorScore], settings: &AssignmentSettings) -> Vec<WeightedAgent> {
    if scores.is_empty() {
        return Vec::new();
    }

    let dense: Vec<&FactorScore> = scores.iter().filter(|s| !s.data_sparse).collect();
    let sales = MaxRelativeScaler.scale(&dense.iter().map(|s| s.sales_volume as f64).collect::<Vec<_>>());
    let inventory = inventory_scaler(settings.inventory_scaling)
        .scale(&dense.iter().map(|s| s.inventory_score as f64).collect::<Vec<_>>());
    let stores = MaxRelativeScaler.scale(&scores.iter().map(|s| s.store_count as f64).collect::<Vec<_>>());

    let composite = WeightedCompositeCalculator::new();
    let mut dense_position = 0;

    scores
        .iter()
        .zip(stores)
        .map(|(score, store_count)| {
            let (sales_volume, inventory_score) = if score.data_sparse {
                (NEUTRAL_SCORE, NEUTRAL_SCORE)
            } else {
                let pair = (sales[dense_position], inventory[dense_position]);
                dense_position += 1;
                pair
            };

            let breakdown = FactorBreakdown {
                turnover_rate: score.turnover_rate,
                store_count,
                inventory_score,
                sales_volume,
            };
            let result = composite.calculate(&settings.ratios, &breakdown);

            WeightedAgent {
                agent_id: score.agent_id.clone(),
                weight: result.weight,
                composite_score: result.score,
                breakdown,
            }
        })
        .collect()
}
