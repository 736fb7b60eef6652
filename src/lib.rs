// src/lib.rs
// anicatalog - Anime catalog browser with episode reconciliation
//
// Architecture:
// - Domain-centric: reconciliation rules live in the domain and services
// - Pure core: the reconciler does no I/O and is deterministic
// - Event-driven: the catalog service announces what it loaded
// - Application Layer: DTOs and commands for the CLI

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;
pub mod integrations;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    // Titles
    Anime,
    AnimeId,
    ApiAnime,
    // Reconciliation
    DubbingGroup,
    DubbingGroups,
    PlayerGroup,
    PriorityTable,
    ReconciliationPolicy,
    TitleId,
    TitleOverride,
    // Videos
    VideoEntry,
    VideoId,
    VideoSource,
};

// ============================================================================
// PUBLIC API - Configuration & Errors
// ============================================================================

pub use config::CatalogConfig;
pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    create_event_bus,
    DomainEvent,
    EpisodesReconciled,
    EventBus,
    EventLogEntry,
    TitleLoaded,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    has_complete_episode_list,
    CatalogService,
    EpisodeReconciler,
    TitleDetails,
    WatchSession,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::AppState;

// Re-export application submodules
pub use application::commands;
pub use application::dto;

// ============================================================================
// PUBLIC API - Integrations
// ============================================================================

pub use integrations::{CatalogApi, CatalogClient};
