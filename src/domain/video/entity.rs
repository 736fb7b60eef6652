// src/domain/video/entity.rs
//
// Raw video entries as delivered by the catalog API's "videos for a title"
// endpoint. One entry per (player, dubbing, episode) record, with noisy and
// overlapping coverage across players.
//
// Fields the reconciliation engine does not understand are carried through
// untouched in `extra` so that consumers see exactly what the API sent.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::domain::url::normalize_url;

/// Player name used when an entry carries none.
pub const UNKNOWN_PLAYER: &str = "Unknown";

/// Dubbing track name used when an entry carries none.
pub const UNKNOWN_DUBBING: &str = "Unknown";

// Numeric passthrough keys, kept verbatim in `extra`
const VIEWS_KEY: &str = "views";
const DURATION_KEY: &str = "duration";

pub type VideoId = u64;

/// A single raw video record for a title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoEntry {
    pub video_id: VideoId,

    /// Episode label as sent by the API (usually a numeric string)
    #[serde(
        default,
        deserialize_with = "deserialize_episode_label",
        skip_serializing_if = "Option::is_none"
    )]
    pub number: Option<String>,

    /// Streaming source and dubbing track
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: VideoSource,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iframe_url: Option<String>,

    /// Everything else, `views` and `duration` included, exactly as sent.
    /// Read those two through `views()` / `duration_secs()`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `data` block of a video entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dubbing: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VideoEntry {
    pub fn new(video_id: VideoId) -> Self {
        Self {
            video_id,
            number: None,
            data: VideoSource::default(),
            iframe_url: None,
            extra: Map::new(),
        }
    }

    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    pub fn with_player(mut self, player: impl Into<String>) -> Self {
        self.data.player = Some(player.into());
        self
    }

    pub fn with_dubbing(mut self, dubbing: impl Into<String>) -> Self {
        self.data.dubbing = Some(dubbing.into());
        self
    }

    pub fn with_views(mut self, views: u64) -> Self {
        self.extra.insert(VIEWS_KEY.to_string(), Value::from(views));
        self
    }

    pub fn with_duration(mut self, duration: u64) -> Self {
        self.extra.insert(DURATION_KEY.to_string(), Value::from(duration));
        self
    }

    pub fn with_iframe_url(mut self, url: impl Into<String>) -> Self {
        self.iframe_url = Some(url.into());
        self
    }

    /// Parsed episode number, 0 when missing or unparseable.
    ///
    /// Note that 0 is both a real episode number and the fallback, so
    /// unnumbered extras and a genuine episode 0 are indistinguishable here.
    pub fn episode_number(&self) -> u32 {
        parse_episode_number(self.number.as_deref())
    }

    /// Player name; missing and empty names both read as "Unknown"
    pub fn player(&self) -> &str {
        non_empty(self.data.player.as_deref()).unwrap_or(UNKNOWN_PLAYER)
    }

    /// Dubbing track; missing and empty names both read as "Unknown"
    pub fn dubbing(&self) -> &str {
        non_empty(self.data.dubbing.as_deref()).unwrap_or(UNKNOWN_DUBBING)
    }

    /// View count, 0 when missing, negative or not a number
    pub fn views(&self) -> u64 {
        lenient_count(self.extra.get(VIEWS_KEY))
    }

    /// Duration in whole seconds, 0 when unknown
    pub fn duration_secs(&self) -> u64 {
        lenient_count(self.extra.get(DURATION_KEY))
    }

    /// Embeddable player URL with protocol-relative links upgraded to https
    pub fn playable_url(&self) -> Option<String> {
        self.iframe_url
            .as_deref()
            .map(normalize_url)
            .filter(|url| !url.is_empty())
    }

    pub fn formatted_duration(&self) -> Option<String> {
        format_duration(self.duration_secs())
    }
}

fn non_empty(name: Option<&str>) -> Option<&str> {
    name.filter(|s| !s.is_empty())
}

/// Non-negative integer view of a loosely typed number. Fractions are
/// truncated; numeric strings are accepted; anything else is 0.
fn lenient_count(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(number)) => number
            .as_u64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|f| f.is_finite() && *f > 0.0)
                    .map(|f| f as u64)
            })
            .unwrap_or(0),
        Some(Value::String(text)) => text.trim().parse::<f64>().map_or(0, |f| {
            if f.is_finite() && f > 0.0 {
                f as u64
            } else {
                0
            }
        }),
        _ => 0,
    }
}

/// Parse an episode label into a non-negative number.
///
/// Reads the leading run of ASCII digits after optional whitespace and an
/// optional `+`, so `"12"`, `" 7"`, `"+5"` and `"3.5"` give 12, 7, 5 and 3.
/// Anything else, including
/// negative labels and values that overflow `u32`, gives 0.
pub fn parse_episode_number(label: Option<&str>) -> u32 {
    let Some(label) = label else {
        return 0;
    };

    let trimmed = label.trim_start();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());

    trimmed[..digits_end].parse::<u32>().unwrap_or(0)
}

/// Format a duration in seconds as `m:ss`; `None` for unknown (0) durations.
pub fn format_duration(seconds: u64) -> Option<String> {
    if seconds == 0 {
        return None;
    }
    Some(format!("{}:{:02}", seconds / 60, seconds % 60))
}

// ============================================================================
// SERDE HELPERS
// ============================================================================

/// Episode labels are strings on the wire, but numbers show up too.
fn deserialize_episode_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Label {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Label>::deserialize(deserializer)?.map(|label| match label {
        Label::Text(text) => text,
        Label::Number(number) => number.to_string(),
    }))
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
