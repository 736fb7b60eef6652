// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// CRITICAL PRINCIPLES:
// - DTOs are UI-friendly representations
// - DTOs are simple, serializable structs
// - Conversion FROM domain values only (never TO)
// - URLs are already normalized, durations already formatted

use serde::{Deserialize, Serialize};

use crate::domain::{Anime, DubbingGroup, DubbingGroups, VideoEntry};
use crate::services::{TitleDetails, WatchSession};

// ============================================================================
// ANIME DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimeDto {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub image: String,
    pub banner: String,
    pub rating: f64,
    pub year: i32,
    pub status: String,
    pub episodes: usize,
    pub genres: Vec<String>,
    pub duration: String,
    pub season: String,
    pub anime_url: Option<String>,
    pub views: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub min_age: String,
}

// ============================================================================
// EPISODE DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeDto {
    pub video_id: u64,
    pub number: u32,
    /// Label as sent by the catalog ("12", "OVA", ...)
    pub label: Option<String>,
    pub player: String,
    pub dubbing: String,
    pub views: u64,
    /// "m:ss", absent when the duration is unknown
    pub duration: Option<String>,
    pub iframe_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DubbingGroupDto {
    pub dubbing: String,
    pub episodes: Vec<EpisodeDto>,
}

// ============================================================================
// PAGE DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleDetailsDto {
    pub anime: AnimeDto,
    /// Tracks in first-seen order
    pub dubbings: Vec<DubbingGroupDto>,
    pub selected_dubbing: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchDto {
    pub anime: AnimeDto,
    pub current: EpisodeDto,
    pub previous: Option<EpisodeDto>,
    pub next: Option<EpisodeDto>,
    pub selected_dubbing: String,
    /// Every track, so the UI can offer a switch
    pub dubbings: Vec<DubbingGroupDto>,
    /// The requested video was replaced by the first episode
    pub redirected: bool,
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<Anime> for AnimeDto {
    fn from(anime: Anime) -> Self {
        Self {
            id: anime.id,
            title: anime.title,
            description: anime.description,
            image: anime.image,
            banner: anime.banner,
            rating: anime.rating,
            year: anime.year,
            status: anime.status,
            episodes: anime.episodes,
            genres: anime.genres,
            duration: anime.duration,
            season: anime.season,
            anime_url: anime.anime_url,
            views: anime.views,
            kind: anime.kind,
            min_age: anime.min_age,
        }
    }
}

impl From<&VideoEntry> for EpisodeDto {
    fn from(video: &VideoEntry) -> Self {
        Self {
            video_id: video.video_id,
            number: video.episode_number(),
            label: video.number.clone(),
            player: video.player().to_string(),
            dubbing: video.dubbing().to_string(),
            views: video.views(),
            duration: video.formatted_duration(),
            iframe_url: video.playable_url(),
        }
    }
}

impl From<&DubbingGroup> for DubbingGroupDto {
    fn from(group: &DubbingGroup) -> Self {
        Self {
            dubbing: group.track.clone(),
            episodes: group.episodes.iter().map(EpisodeDto::from).collect(),
        }
    }
}

fn dubbing_dtos(groups: &DubbingGroups) -> Vec<DubbingGroupDto> {
    groups.iter().map(DubbingGroupDto::from).collect()
}

impl From<TitleDetails> for TitleDetailsDto {
    fn from(details: TitleDetails) -> Self {
        Self {
            dubbings: dubbing_dtos(&details.groups),
            anime: AnimeDto::from(details.anime),
            selected_dubbing: details.selected_dubbing,
        }
    }
}

impl WatchDto {
    /// None only for a session without a current episode
    pub fn from_session(session: &WatchSession) -> Option<Self> {
        let current = EpisodeDto::from(session.current()?);

        Some(Self {
            anime: AnimeDto::from(session.anime.clone()),
            current,
            previous: session.previous().map(EpisodeDto::from),
            next: session.next().map(EpisodeDto::from),
            selected_dubbing: session.selected_dubbing().to_string(),
            dubbings: dubbing_dtos(session.groups()),
            redirected: session.redirected,
        })
    }
}
