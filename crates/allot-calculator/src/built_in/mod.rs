//! Built-in calculators provided by the Allot engine.

// Raw indicator calculators
pub mod turnover_rate;

// Population scalers
pub mod clamped_shift;
pub mod max_relative;
pub mod min_max;

// Combination
pub mod weighted_composite;

// Allocation calculators
pub mod proportional_allocator;
