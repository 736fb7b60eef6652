// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod anime;
pub mod reconciliation;
pub mod url;
pub mod video;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Catalog titles
pub use anime::{Anime, AnimeId, ApiAnime};

// Raw videos
pub use video::{
    format_duration, parse_episode_number, VideoEntry, VideoId, VideoSource, UNKNOWN_DUBBING,
    UNKNOWN_PLAYER,
};

// Reconciliation
pub use reconciliation::{
    DubbingGroup, DubbingGroups, PlayerGroup, PriorityTable, ReconciliationPolicy, TitleId,
    TitleOverride,
};

pub use url::normalize_url;
