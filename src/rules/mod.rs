//! Composable access rules (Specification pattern)
//!
//! Endpoint guards are built from small async predicates over an
//! [`AccessContext`]:
//!
//! ```ignore
//! let guard = AllOf::new(vec![
//!     Arc::new(HasRole(ParticipantRole::Jury)),
//!     Arc::new(InStage(StageKind::Evaluation)),
//! ]);
//! ```

pub mod access_rules;
pub mod context;
pub mod operators;
pub mod specification;

pub use access_rules::{HasContestScope, HasRole, InStage, NotBlocked};
pub use context::{AccessContext, AccessLookup};
pub use operators::Spec;
pub use specification::{AllOf, And, AnyOf, BoxedSpec, Not, Or, Specification};
