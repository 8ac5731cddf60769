//! Utility functions

pub mod diff;
pub mod time;
pub mod validation;

pub use diff::{Diff, diff_by_key};
pub use time::{full_age, today};
