// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod catalog_service;
pub mod reconciliation_service;


// Re-export all services and their types
pub use catalog_service::{
    CatalogService,
    TitleDetails,
    WatchSession,
};

pub use reconciliation_service::{
    has_complete_episode_list,
    EpisodeReconciler,
};
