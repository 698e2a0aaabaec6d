//! Max-Relative Scaler
//!
//! result[i] = values[i] / max(values) * 100
//!
//! Every result is `ZERO_DENOMINATOR_RESULT` when the maximum is not positive.
//! Used for sales volume and store count, which are never negative.

use crate::Scaler;
use crate::constants::scores::{SCORE_SCALE, ZERO_DENOMINATOR_RESULT};

#[derive(Debug, Default, Clone, Copy)]
pub struct MaxRelativeScaler;

impl Scaler for MaxRelativeScaler {
    fn name(&self) -> &str {
        "max_relative"
    }

    fn scale(&self, values: &[f64]) -> Vec<f64> {
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if !(max > 0.0) {
            return vec![ZERO_DENOMINATOR_RESULT; values.len()];
        }
        values.iter().map(|v| (v / max * SCORE_SCALE).max(0.0)).collect()
    }
}
