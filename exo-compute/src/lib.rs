//! Normalization and randomized generation of math exercises.
//!
//! Exercises are written as expressions containing template placeholders, such as
//! `$e[2;9]*x+$e{1}`, parsed by [`exo_parser`]. This crate provides:
//!
//! - [`numerical`]: exact evaluation, numeric reduction and the total order on expressions.
//! - [`symbolic`]: bracket elision, sign normalization, canonical ordering, substitution,
//!   random reordering, and the normal form used to compare answers.
//! - [`template`]: the generation engine that replaces placeholders by random values, and
//!   matching of answers against templates.
//!
//! ```
//! use exo_compute::{symbolic::normal, template::generate};
//! use exo_parser::parse;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(3);
//! let exercise = generate(&parse("$e[2;9]*(x+$1)").unwrap(), &mut rng).unwrap();
//! let answer = normal(&exercise).unwrap();
//! assert_eq!(answer.to_string().matches('x').count(), 1);
//! ```

pub mod consts;
pub mod numerical;
pub mod symbolic;
pub mod template;

pub use numerical::{compare, eval, value, EvalOptions};
pub use symbolic::{normal, substitute};
pub use template::{generate, generate_with, match_template, GenerateOptions};
