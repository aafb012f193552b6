//! Constants shared by the evaluation, substitution and generation modules.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Named constants that substitution replaces before looking at caller bindings. Their values are
/// the school approximations the exercises are written with.
pub static CONSTANTS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("pi", "3.14"),
        ("e", "2.7"),
    ])
});

/// The number of fractional digits `$$` keeps when the template does not give one.
pub const DEFAULT_PRECISION: u32 = 2;

/// The number of draws a template may reject before generation gives up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// How many times a symbol may be replaced along one chain of substitutions.
pub const DEFAULT_MAX_SUBSTITUTION_DEPTH: usize = 32;

/// The largest number of digits a drawn integer may have, so every draw fits in an `i64`.
pub const MAX_DIGITS: u32 = 18;

/// The largest integer exponent a power of a sum is expanded to in normal form. Larger powers
/// are kept as opaque factors.
pub const MAX_EXPANSION_DEGREE: u32 = 16;

/// The largest magnitude of an integer exponent evaluated exactly.
pub const MAX_EXPONENT: u32 = 1 << 12;

/// The largest number of fractional digits searched when writing an exact value as a decimal.
pub const MAX_DECIMAL_DIGITS: u32 = 64;

/// The largest number of fractional digits decimal mode rounds to.
pub const MAX_PRECISION: u32 = 1000;
