//! Min-Max Scaler
//!
//! Linear rescale of the slice onto [0, 100]. When every value is equal the
//! whole population receives `NEUTRAL_SCORE`.

use crate::Scaler;
use crate::constants::scores::{NEUTRAL_SCORE, SCORE_SCALE};

#[derive(Debug, Default, Clone, Copy)]
pub struct MinMaxScaler;

impl Scaler for MinMaxScaler {
    fn name(&self) -> &str {
        "min_max"
    }

    fn scale(&self, values: &[f64]) -> Vec<f64> {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = max - min;

        if !(range > 0.0) {
            return vec![NEUTRAL_SCORE; values.len()];
        }
        values.iter().map(|v| (v - min) / range * SCORE_SCALE).collect()
    }
}
