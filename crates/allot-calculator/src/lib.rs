//! The calculator layer of the Allot engine.
//!
//! Everything in this crate is a pure function of its inputs: turnover rates,
//! population scalers, the weighted composite and the largest-remainder
//! apportionment. The engine in `allot-core` wires them together; keeping them
//! here lets each one be tested without rosters, snapshots or caches.

pub mod built_in;
pub mod constants;

pub use built_in::clamped_shift::ClampedShiftScaler;
pub use built_in::max_relative::MaxRelativeScaler;
pub use built_in::min_max::MinMaxScaler;
pub use built_in::proportional_allocator::{AllocationOutcome, ProportionalAllocator};
pub use built_in::turnover_rate::TurnoverRateCalculator;
pub use built_in::weighted_composite::{CompositeScore, WeightedCompositeCalculator};

use allot_types::InventoryScaling;

/// A trait for population scalers.
/// Scalers are stateless and thread-safe.
pub trait Scaler: Send + Sync {
    /// The name of the scaler, used in logs.
    fn name(&self) -> &str;

    /// Map every value onto the 0–100 scale relative to the whole slice.
    /// The output has the same length and order as the input.
    fn scale(&self, values: &[f64]) -> Vec<f64>;
}

/// Pick the scaler for the inventory score factor
pub fn inventory_scaler(scaling: InventoryScaling) -> Box<dyn Scaler> {
    match scaling {
        InventoryScaling::MinMax => Box::new(MinMaxScaler),
        InventoryScaling::Clamped => Box::new(ClampedShiftScaler),
    }
}
