//! Constraint module
//!
//! Typed rules for environment variables and the ordered set they live in.

pub mod number;
pub mod types;

pub use number::{format_number, parse_number};
pub use types::{Constraint, ConstraintSet};
