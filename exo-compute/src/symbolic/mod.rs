//! Structural rewrites of expression trees.
//!
//! These functions change how an expression is written without evaluating it, with the
//! exception of [`normal`], which reduces it completely:
//!
//! - [`elide`] removes brackets that do not change the reading of an expression.
//! - [`normalize_signs`] folds redundant signs: `-(-a)` is `a`, `(-4)*(-5)` is `4*5`.
//! - [`canonicalize`] sorts the operands of sums and products.
//! - [`substitute`] replaces parameters and named constants by their definitions.
//! - [`shuffle_terms`] and [`shuffle_factors`] reorder operands at random.
//! - [`normal`] computes the normal form used to compare answers.
//!
//! Every function returns a new tree and leaves its input untouched.

pub mod brackets;
pub mod error;
pub mod normal;
pub mod order;
pub mod shuffle;
pub mod signs;
pub mod substitute;

pub use brackets::{elide, group, is_redundant};
pub use normal::{equivalent, normal};
pub use order::canonicalize;
pub use shuffle::{shuffle_factors, shuffle_terms};
pub use signs::normalize_signs;
pub use substitute::{substitute, substitute_with, SubstituteOptions};
