// src/domain/reconciliation/value_objects.rs
//
// Reconciliation Value Objects
//
// Pure data produced while reconciling a title's raw video list:
// - PlayerGroup: transient, borrowed view of one player's entries
// - DubbingGroups: ordered track → episodes mapping handed to callers

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::domain::video::VideoEntry;

// ============================================================================
// PLAYER GROUP
// ============================================================================

/// All entries of one player for a title, with its selection scores.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerGroup<'a> {
    pub player: &'a str,
    pub videos: Vec<&'a VideoEntry>,

    /// Episode numbers form a gap-free run (see the reconciler for the exact rule)
    pub is_complete: bool,

    pub priority: i32,
}

impl PlayerGroup<'_> {
    /// Raw entry count, duplicates included
    pub fn episode_count(&self) -> usize {
        self.videos.len()
    }
}

// ============================================================================
// DUBBING GROUPS
// ============================================================================

/// Episodes of a single dubbing track, ascending by episode number
#[derive(Debug, Clone, PartialEq)]
pub struct DubbingGroup {
    pub track: String,
    pub episodes: Vec<VideoEntry>,
}

/// Dubbing track → episodes, iterated in first-seen track order.
///
/// Serializes as a JSON object whose keys keep that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DubbingGroups {
    groups: Vec<DubbingGroup>,
}

impl DubbingGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a video to its track's bucket, opening the bucket if unseen.
    pub fn push(&mut self, video: VideoEntry) {
        let track = video.dubbing().to_string();
        match self.groups.iter_mut().find(|g| g.track == track) {
            Some(group) => group.episodes.push(video),
            None => self.groups.push(DubbingGroup {
                track,
                episodes: vec![video],
            }),
        }
    }

    /// Stable sort of every bucket by episode number
    pub(crate) fn sort_episodes(&mut self) {
        for group in &mut self.groups {
            group.episodes.sort_by_key(VideoEntry::episode_number);
        }
    }

    pub fn get(&self, track: &str) -> Option<&[VideoEntry]> {
        self.groups
            .iter()
            .find(|g| g.track == track)
            .map(|g| g.episodes.as_slice())
    }

    pub fn contains_track(&self, track: &str) -> bool {
        self.groups.iter().any(|g| g.track == track)
    }

    pub fn tracks(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.track.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &DubbingGroup> {
        self.groups.iter()
    }

    pub fn first(&self) -> Option<&DubbingGroup> {
        self.groups.first()
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total entries across all tracks
    pub fn episode_count(&self) -> usize {
        self.groups.iter().map(|g| g.episodes.len()).sum()
    }

    /// Find a video anywhere in the groups
    pub fn find_video(&self, video_id: u64) -> Option<&VideoEntry> {
        self.groups
            .iter()
            .flat_map(|g| g.episodes.iter())
            .find(|v| v.video_id == video_id)
    }

    /// All entries, track by track
    pub fn into_flat(self) -> Vec<VideoEntry> {
        self.groups.into_iter().flat_map(|g| g.episodes).collect()
    }
}

impl IntoIterator for DubbingGroups {
    type Item = DubbingGroup;
    type IntoIter = std::vec::IntoIter<DubbingGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl Serialize for DubbingGroups {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for group in &self.groups {
            map.serialize_entry(&group.track, &group.episodes)?;
        }
        map.end()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: u64, number: &str, dubbing: Option<&str>) -> VideoEntry {
        let video = VideoEntry::new(id).with_number(number).with_player("Kodik");
        match dubbing {
            Some(track) => video.with_dubbing(track),
            None => video,
        }
    }

    #[test]
    fn test_push_keeps_first_seen_track_order() {
        let mut groups = DubbingGroups::new();
        groups.push(video(1, "1", Some("SHIZA")));
        groups.push(video(2, "1", Some("AniLibria")));
        groups.push(video(3, "2", Some("SHIZA")));
        groups.push(video(4, "1", None));

        let tracks: Vec<&str> = groups.tracks().collect();
        assert_eq!(tracks, vec!["SHIZA", "AniLibria", "Unknown"]);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups.episode_count(), 4);
        assert_eq!(groups.get("SHIZA").unwrap().len(), 2);
        assert!(groups.get("Missing").is_none());
    }

    #[test]
    fn test_sort_episodes_orders_each_track() {
        let mut groups = DubbingGroups::new();
        groups.push(video(1, "3", Some("A")));
        groups.push(video(2, "1", Some("A")));
        groups.push(video(3, "2", Some("A")));
        groups.sort_episodes();

        let numbers: Vec<u32> = groups
            .get("A")
            .unwrap()
            .iter()
            .map(VideoEntry::episode_number)
            .collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let mut groups = DubbingGroups::new();
        groups.push(video(1, "1", Some("Zeta")));
        groups.push(video(2, "1", Some("Alpha")));

        let json = serde_json::to_string(&groups).unwrap();
        let zeta = json.find("\"Zeta\"").unwrap();
        let alpha = json.find("\"Alpha\"").unwrap();
        assert!(zeta < alpha, "track order must follow insertion: {}", json);
    }

    #[test]
    fn test_find_video_and_flatten() {
        let mut groups = DubbingGroups::new();
        groups.push(video(10, "1", Some("A")));
        groups.push(video(20, "1", Some("B")));

        assert_eq!(groups.find_video(20).map(|v| v.dubbing()), Some("B"));
        assert!(groups.find_video(30).is_none());

        let ids: Vec<u64> = groups.into_flat().iter().map(|v| v.video_id).collect();
        assert_eq!(ids, vec![10, 20]);
    }
}
