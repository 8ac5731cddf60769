//! Domain models
//!
//! This module contains all domain models used throughout the application.

pub mod application;
pub mod contest;
pub mod criteria;
pub mod file_constraint;
pub mod participant;
pub mod stage;
pub mod user;
pub mod winner;
pub mod work_rate;

pub use application::*;
pub use contest::*;
pub use criteria::*;
pub use file_constraint::*;
pub use participant::*;
pub use stage::*;
pub use user::*;
pub use winner::*;
pub use work_rate::*;

/// A stored enum column held a value this build does not know about
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
