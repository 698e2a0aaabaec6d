/// Scoring constants shared by every calculator
///
/// Fallback values live here so that each is applied at exactly one place.
/// Score scale and fallback policy
pub mod scores {
    /// Upper bound of every normalized factor
    pub const SCORE_SCALE: f64 = 100.0;

    /// Raw score given to agents with no activity or inventory data,
    /// and the min–max result when the whole population is equal
    pub const NEUTRAL_SCORE: f64 = 50.0;

    /// Result of any ratio whose denominator is zero
    pub const ZERO_DENOMINATOR_RESULT: f64 = 0.0;
}

/// Bounds used by the clamped inventory scaling
pub mod inventory {
    /// Lowest inventory score kept before shifting
    pub const CLAMP_MIN: f64 = -50.0;

    /// Highest inventory score kept before shifting
    pub const CLAMP_MAX: f64 = 50.0;
}
