//! The evaluation layer: exact values, numeric reduction and the total order on expressions.
//!
//! Every value is computed exactly with [`rug::Rational`]. [`value`] returns the value of a
//! numeric tree, [`eval`] writes it back as a number node (a fraction or a rounded decimal), and
//! [`compare`] orders arbitrary trees for canonical sorting.
//!
//! ```
//! use exo_compute::numerical::{eval, EvalOptions};
//! use exo_parser::parse;
//!
//! let node = parse("2/3:(5/7)").unwrap();
//! assert_eq!(eval(&node, EvalOptions::default()).unwrap().to_string(), "14/15");
//! assert_eq!(eval(&node, EvalOptions::decimal(2)).unwrap().to_string(), "0.93");
//! ```

pub mod compare;
pub mod convert;
pub mod error;
pub mod value;

pub use compare::compare;
pub use convert::{decimal_node, fraction_node, integer_node, rational, rounded_node};
pub use value::{eval, integer_value, root, value, EvalOptions};
