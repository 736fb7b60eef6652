// src/domain/anime/entity.rs
//
// Catalog titles: the wire shape and the display model built from it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::url::normalize_url;

pub type AnimeId = u64;

const DEFAULT_STATUS: &str = "Unknown";
const DEFAULT_DURATION: &str = "24 min";

/// A title exactly as the catalog API returns it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiAnime {
    pub anime_id: AnimeId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub poster: Option<Poster>,

    #[serde(default)]
    pub rating: Option<Rating>,

    #[serde(default)]
    pub year: Option<i32>,

    #[serde(default)]
    pub anime_status: Option<Titled>,

    #[serde(default)]
    pub genres: Option<Vec<Titled>>,

    /// Number or string depending on the title
    #[serde(default)]
    pub season: Option<Value>,

    #[serde(default)]
    pub anime_url: Option<String>,

    #[serde(default)]
    pub views: Option<u64>,

    #[serde(default, rename = "type")]
    pub kind: Option<Named>,

    #[serde(default)]
    pub min_age: Option<Titled>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Poster URLs from smallest to largest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Poster {
    pub small: Option<String>,
    pub medium: Option<String>,
    pub big: Option<String>,
    pub huge: Option<String>,
    pub fullsize: Option<String>,
    pub mega: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub average: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Titled {
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Named {
    pub name: Option<String>,
}

/// Catalog title prepared for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anime {
    pub id: AnimeId,
    pub title: String,
    pub description: String,

    /// Card image, largest available poster up to `huge`
    pub image: String,

    /// Backdrop image, largest available poster
    pub banner: String,

    pub rating: f64,
    pub year: i32,
    pub status: String,

    /// Episodes in the first dubbing track, 0 when not computed
    pub episodes: usize,

    pub genres: Vec<String>,
    pub duration: String,
    pub season: String,
    pub anime_url: Option<String>,
    pub views: u64,
    pub kind: String,
    pub min_age: String,
}

impl Anime {
    /// Build the display model from an API title
    pub fn from_api(api: &ApiAnime, episode_count: usize) -> Self {
        let poster = api.poster.clone().unwrap_or_default();

        let image = first_non_empty(&[&poster.huge, &poster.big, &poster.medium, &poster.small]);
        let banner = first_non_empty(&[&poster.mega, &poster.fullsize, &poster.huge]);

        Self {
            id: api.anime_id,
            title: api.title.clone(),
            description: api.description.clone().unwrap_or_default(),
            image: normalize_url(image),
            banner: normalize_url(banner),
            rating: api
                .rating
                .as_ref()
                .and_then(|r| r.average)
                .unwrap_or(0.0),
            year: api.year.unwrap_or(0),
            status: titled(&api.anime_status)
                .unwrap_or(DEFAULT_STATUS)
                .to_string(),
            episodes: episode_count,
            genres: api
                .genres
                .iter()
                .flatten()
                .filter_map(|g| g.title.clone())
                .collect(),
            duration: DEFAULT_DURATION.to_string(),
            season: season_label(api.season.as_ref()),
            anime_url: api.anime_url.clone(),
            views: api.views.unwrap_or(0),
            kind: api
                .kind
                .as_ref()
                .and_then(|k| k.name.clone())
                .unwrap_or_default(),
            min_age: titled(&api.min_age).unwrap_or_default().to_string(),
        }
    }
}

fn first_non_empty<'a>(candidates: &[&'a Option<String>]) -> &'a str {
    candidates
        .iter()
        .filter_map(|c| c.as_deref())
        .find(|c| !c.is_empty())
        .unwrap_or("")
}

fn titled(value: &Option<Titled>) -> Option<&str> {
    value
        .as_ref()
        .and_then(|t| t.title.as_deref())
        .filter(|t| !t.is_empty())
}

fn season_label(season: Option<&Value>) -> String {
    match season {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
