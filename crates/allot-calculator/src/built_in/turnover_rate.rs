//! Turnover Rate Calculator
//!
//! result = sales / (inventory + sales) * 100
//!
//! Returns `ZERO_DENOMINATOR_RESULT` when both are 0.

use crate::constants::scores::{SCORE_SCALE, ZERO_DENOMINATOR_RESULT};

#[derive(Debug, Default, Clone, Copy)]
pub struct TurnoverRateCalculator;

impl TurnoverRateCalculator {
    pub fn calculate(&self, sales_volume: u64, remaining_inventory: u64) -> f64 {
        let denominator = sales_volume.saturating_add(remaining_inventory);
        if denominator == 0 {
            return ZERO_DENOMINATOR_RESULT;
        }
        sales_volume as f64 / denominator as f64 * SCORE_SCALE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turnover_rate() {
        let calc = TurnoverRateCalculator;
        assert_eq!(calc.calculate(30, 10), 75.0);
        assert_eq!(calc.calculate(0, 10), 0.0);
        assert_eq!(calc.calculate(5, 0), 100.0);
        assert_eq!(calc.calculate(0, 0), ZERO_DENOMINATOR_RESULT);
    }
}
