//! The kinds of errors raised while generating values for templates.

use ariadne::Fmt;
use exo_attrs::ErrorKind;
use exo_error::EXPR;

/// Every draw was rejected by the template's exclusions.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("no value satisfies this template after {} attempts", attempts),
    labels = ["this template"],
    help = "relax the exclusions, or widen the bounds",
)]
pub struct GenerationExhausted {
    /// The number of draws made before giving up.
    pub attempts: usize,
}

/// A back-reference names a value that has not been generated yet.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("back-reference `${}` used when only {} values were generated", index, len),
    labels = ["this back-reference"],
    help = format!("back-references count from {}, in the order templates are generated", "1".fg(EXPR)),
)]
pub struct BackReferenceOutOfRange {
    pub index: usize,
    pub len: usize,
}

/// A template cannot be generated from: its bounds are missing, of the wrong shape for its
/// nature, or resolve to unusable values.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("malformed template: {}", reason),
    labels = ["this template"],
)]
pub struct MalformedTemplate {
    pub reason: String,
}
