//! Database repositories
//!
//! Repositories handle all direct database interactions. Functions that run
//! a single statement take any executor (pool or transaction); functions that
//! run several take a connection so callers can keep them in one transaction.

pub mod application_repo;
pub mod contest_repo;
pub mod criteria_repo;
pub mod file_constraint_repo;
pub mod nomination_repo;
pub mod participant_repo;
pub mod stage_repo;
pub mod user_repo;
pub mod winner_repo;
pub mod work_rate_repo;

pub use application_repo::{ApplicationRepository, NewApplication};
pub use contest_repo::{ContestPatch, ContestRepository, NewContest};
pub use criteria_repo::{CriteriaRepository, CriterionRow};
pub use file_constraint_repo::FileConstraintRepository;
pub use nomination_repo::NominationRepository;
pub use participant_repo::ParticipantRepository;
pub use stage_repo::StageRepository;
pub use user_repo::UserRepository;
pub use winner_repo::WinnerRepository;
pub use work_rate_repo::WorkRateRepository;
