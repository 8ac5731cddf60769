//! Business logic services

pub mod access;
pub mod application_service;
pub mod contest_service;
pub mod participant_service;
pub mod stage_resolver;
pub mod user_directory;
pub mod winner_service;
pub mod work_rate_service;

pub use access::{AccessGuard, PgAccessLookup};
pub use application_service::ApplicationService;
pub use contest_service::ContestService;
pub use participant_service::ParticipantService;
pub use stage_resolver::{PgStageWindows, StageResolver, StageWindowSource};
pub use user_directory::{PgUserDirectory, UserDirectory};
pub use winner_service::WinnerService;
pub use work_rate_service::WorkRateService;
