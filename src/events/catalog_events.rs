// src/events/catalog_events.rs
//
// Events emitted while browsing the catalog.
//
// EpisodesReconciled is informational: reconciliation itself is pure and
// never depends on who listens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::DomainEvent;
use crate::domain::anime::AnimeId;

// ============================================================================
// TITLE EVENTS
// ============================================================================

/// Emitted when a title's metadata has been fetched and mapped
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleLoaded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub anime_id: AnimeId,
    pub title: String,
}

impl TitleLoaded {
    pub fn new(anime_id: AnimeId, title: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            anime_id,
            title,
        }
    }
}

impl DomainEvent for TitleLoaded {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "TitleLoaded"
    }
}

// ============================================================================
// RECONCILIATION EVENTS
// ============================================================================

/// Emitted after a title's raw video list was reduced to one player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodesReconciled {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub anime_id: AnimeId,
    /// None when the title had no videos at all
    pub selected_player: Option<String>,
    pub episode_count: usize,
    pub dubbing_tracks: usize,
}

impl EpisodesReconciled {
    pub fn new(
        anime_id: AnimeId,
        selected_player: Option<String>,
        episode_count: usize,
        dubbing_tracks: usize,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            anime_id,
            selected_player,
            episode_count,
            dubbing_tracks,
        }
    }
}

impl DomainEvent for EpisodesReconciled {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "EpisodesReconciled"
    }
}
