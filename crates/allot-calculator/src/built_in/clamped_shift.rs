//! Clamped Shift Scaler
//!
//! Clamps each value to [-50, 50] and shifts it onto [0, 100]. Unlike the other
//! scalers the result does not depend on the rest of the population.

use crate::Scaler;
use crate::constants::inventory::{CLAMP_MAX, CLAMP_MIN};

#[derive(Debug, Default, Clone, Copy)]
pub struct ClampedShiftScaler;

impl Scaler for ClampedShiftScaler {
    fn name(&self) -> &str {
        "clamped_shift"
    }

    fn scale(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|v| v.clamp(CLAMP_MIN, CLAMP_MAX) - CLAMP_MIN).collect()
    }
}
