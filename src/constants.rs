//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

// =============================================================================
// AUTHENTICATION
// =============================================================================

/// Scheme prefix of the Authorization header
pub const BEARER_PREFIX: &str = "Bearer ";

// =============================================================================
// CONTEST SCOPE
// =============================================================================

/// Header carrying the contest a request operates on
pub const CONTEST_ID_HEADER: &str = "x-contest-id";

/// Region value that makes a contest open to applicants from any region
pub const ONLINE_REGION: &str = "online";

// =============================================================================
// STAGE CACHE
// =============================================================================

/// Default lifetime of a cached stage resolution, in seconds
pub const DEFAULT_STAGE_CACHE_TTL_SECS: u64 = 30 * 60;

/// Redis key prefix for cached stage resolutions
pub const STAGE_CACHE_KEY_PREFIX: &str = "contest_stage";

// =============================================================================
// VALIDATION
// =============================================================================

/// Maximum contest title length
pub const MAX_CONTEST_TITLE_LENGTH: u64 = 255;

/// Maximum contest description length
pub const MAX_CONTEST_DESCRIPTION_LENGTH: u64 = 4096;

/// Maximum length of short text fields (names, links, organizer, ...)
pub const MAX_SHORT_TEXT_LENGTH: u64 = 255;

/// Maximum application annotation length
pub const MAX_ANNOTATION_LENGTH: u64 = 2048;

/// Maximum number of items accepted in one bulk configuration call
pub const MAX_BATCH_ITEMS: u64 = 200;

/// Maximum number of file constraints attached to one contest
pub const MAX_FILE_CONSTRAINTS: u64 = 3;

// =============================================================================
// API VERSIONING
// =============================================================================

/// API base path
pub const API_BASE_PATH: &str = "/api/v1";
