/// Engine-level constants used throughout the Allot core
///
/// Scoring fallbacks live in `allot_calculator::constants`; this module holds the
/// values that shape caching and naming.
/// Score cache defaults
pub mod cache {
    /// Default lifetime of a cached score set (5 minutes)
    pub const DEFAULT_TTL_SECONDS: u64 = 300;

    /// Default upper bound on live cache entries
    pub const DEFAULT_MAX_ENTRIES: usize = 1024;

    /// Separator between fingerprint components
    pub const KEY_SEPARATOR: char = '\u{1f}';
}

/// Agent label normalization
pub mod names {
    /// Opening brackets that start a suffix to strip, e.g. `"Kim (별도)"`
    pub const SUFFIX_OPENERS: [char; 2] = ['(', '（'];

    /// Matching closers; a suffix is only stripped when the label ends with one
    pub const SUFFIX_CLOSERS: [char; 2] = [')', '）'];
}
