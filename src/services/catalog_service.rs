// src/services/catalog_service.rs
//
// Catalog Service - Browsing Orchestration
//
// ARCHITECTURE:
// - Fetches titles and raw videos through CatalogApi
// - Runs them through the EpisodeReconciler
// - Builds the view models used by the commands and the CLI
//
// CRITICAL RULES:
// - Raw videos are grouped exactly once per request (group_by_dubbing
//   reconciles internally, never feed it reconciled output)
// - The title id is always passed along so per-title overrides apply
// - No caching

use std::sync::Arc;

use serde::Serialize;

use crate::domain::anime::{Anime, AnimeId};
use crate::domain::reconciliation::{DubbingGroups, TitleId};
use crate::domain::video::{VideoEntry, VideoId};
use crate::error::{AppError, AppResult};
use crate::events::{EpisodesReconciled, EventBus, TitleLoaded};
use crate::integrations::catalog::CatalogApi;
use crate::services::reconciliation_service::EpisodeReconciler;

// ============================================================================
// VIEW MODELS
// ============================================================================

/// Everything the title page needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleDetails {
    pub anime: Anime,
    pub groups: DubbingGroups,
    /// First dubbing track, None when the title has no videos
    pub selected_dubbing: Option<String>,
}

/// Player state for one title: current episode plus track navigation
#[derive(Debug, Clone, PartialEq)]
pub struct WatchSession {
    pub anime: Anime,
    groups: DubbingGroups,
    selected_dubbing: String,
    position: usize,
    /// The requested video was not among the reconciled episodes
    pub redirected: bool,
}

impl WatchSession {
    /// Position the session on `requested`, or on the lowest episode when
    /// it is absent or unknown. None when there is nothing to play.
    pub fn new(anime: Anime, groups: DubbingGroups, requested: Option<VideoId>) -> Option<Self> {
        let found = requested.and_then(|id| locate(&groups, |v| v.video_id == id));

        let (track, position, redirected) = match found {
            Some((track, position)) => (track, position, false),
            None => {
                let lowest = groups
                    .iter()
                    .flat_map(|g| g.episodes.iter())
                    .map(VideoEntry::episode_number)
                    .min()?;
                let (track, position) = locate(&groups, |v| v.episode_number() == lowest)?;
                (track, position, requested.is_some())
            }
        };

        Some(Self {
            anime,
            groups,
            selected_dubbing: track,
            position,
            redirected,
        })
    }

    pub fn groups(&self) -> &DubbingGroups {
        &self.groups
    }

    pub fn selected_dubbing(&self) -> &str {
        &self.selected_dubbing
    }

    /// Episodes of the selected track
    pub fn episodes(&self) -> &[VideoEntry] {
        self.groups.get(&self.selected_dubbing).unwrap_or(&[])
    }

    pub fn current(&self) -> Option<&VideoEntry> {
        self.episodes().get(self.position)
    }

    pub fn previous(&self) -> Option<&VideoEntry> {
        self.position
            .checked_sub(1)
            .and_then(|idx| self.episodes().get(idx))
    }

    pub fn next(&self) -> Option<&VideoEntry> {
        self.episodes().get(self.position + 1)
    }

    /// Switch track and jump to its first episode. False for unknown tracks.
    pub fn select_dubbing(&mut self, track: &str) -> bool {
        if !self.groups.contains_track(track) {
            return false;
        }
        self.selected_dubbing = track.to_string();
        self.position = 0;
        true
    }

    /// Jump to a video of any track. False when it is not a reconciled episode.
    pub fn select_video(&mut self, video_id: VideoId) -> bool {
        match locate(&self.groups, |v| v.video_id == video_id) {
            Some((track, position)) => {
                self.selected_dubbing = track;
                self.position = position;
                true
            }
            None => false,
        }
    }
}

/// Track name and index of the first episode matching `predicate`
fn locate<P>(groups: &DubbingGroups, predicate: P) -> Option<(String, usize)>
where
    P: Fn(&VideoEntry) -> bool,
{
    groups.iter().find_map(|group| {
        group
            .episodes
            .iter()
            .position(&predicate)
            .map(|idx| (group.track.clone(), idx))
    })
}

// ============================================================================
// CATALOG SERVICE
// ============================================================================

pub struct CatalogService {
    api: Arc<dyn CatalogApi>,
    reconciler: Arc<EpisodeReconciler>,
    event_bus: Arc<EventBus>,
}

impl CatalogService {
    pub fn new(
        api: Arc<dyn CatalogApi>,
        reconciler: Arc<EpisodeReconciler>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            api,
            reconciler,
            event_bus,
        }
    }

    pub fn reconciler(&self) -> &EpisodeReconciler {
        &self.reconciler
    }

    /// Front-page titles (episode counts are not computed here)
    pub async fn list_titles(&self) -> AppResult<Vec<Anime>> {
        let titles = self.api.list_anime().await?;
        Ok(titles.iter().map(|api| Anime::from_api(api, 0)).collect())
    }

    /// Search by title. A blank query returns nothing without asking the API.
    pub async fn search(&self, query: &str, limit: u32, offset: u32) -> AppResult<Vec<Anime>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let results = self.api.search(query, limit, offset).await?;
        log::info!("Search '{}' returned {} titles", query, results.len());
        Ok(results.iter().map(|api| Anime::from_api(api, 0)).collect())
    }

    pub async fn title_details(&self, anime_id: AnimeId) -> AppResult<TitleDetails> {
        let (anime, groups) = self.load_title(anime_id).await?;
        let selected_dubbing = groups.first().map(|g| g.track.clone());

        Ok(TitleDetails {
            anime,
            groups,
            selected_dubbing,
        })
    }

    /// Open the player on `video_id` (or the first episode).
    pub async fn watch(&self, anime_id: AnimeId, video_id: Option<VideoId>) -> AppResult<WatchSession> {
        let (anime, groups) = self.load_title(anime_id).await?;

        let session = WatchSession::new(anime, groups, video_id)
            .ok_or_else(|| AppError::not_found(format!("No videos for anime {}", anime_id)))?;

        if session.redirected {
            log::info!(
                "Video {:?} is not a reconciled episode of anime {}, starting from the first one",
                video_id,
                anime_id
            );
        }

        Ok(session)
    }

    // ========================================================================
    // INTERNAL
    // ========================================================================

    /// Fetch metadata and videos, reconcile once, emit events.
    async fn load_title(&self, anime_id: AnimeId) -> AppResult<(Anime, DubbingGroups)> {
        let (api_anime, videos) = tokio::try_join!(
            self.api.get_anime(anime_id),
            self.api.list_videos(anime_id)
        )?;

        let api_anime =
            api_anime.ok_or_else(|| AppError::not_found(format!("Anime {}", anime_id)))?;

        let title = TitleId::from(anime_id);
        let groups = self.reconciler.group_by_dubbing(&videos, Some(&title));

        let selected_player = groups
            .first()
            .and_then(|g| g.episodes.first())
            .map(|v| v.player().to_string());

        let episode_count = groups.first().map(|g| g.episodes.len()).unwrap_or(0);
        let anime = Anime::from_api(&api_anime, episode_count);

        self.event_bus
            .emit(TitleLoaded::new(anime_id, anime.title.clone()));
        self.event_bus.emit(EpisodesReconciled::new(
            anime_id,
            selected_player,
            groups.episode_count(),
            groups.len(),
        ));

        Ok((anime, groups))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::anime::ApiAnime;
    use crate::integrations::catalog::MockCatalogApi;
    use serde_json::json;

    fn api_anime(id: AnimeId, title: &str) -> ApiAnime {
        serde_json::from_value(json!({ "anime_id": id, "title": title })).unwrap()
    }

    fn video(id: u64, player: &str, number: &str, dubbing: &str) -> VideoEntry {
        VideoEntry::new(id)
            .with_player(player)
            .with_number(number)
            .with_dubbing(dubbing)
    }

    fn service_with(mock: MockCatalogApi) -> (CatalogService, Arc<EventBus>) {
        let bus = Arc::new(EventBus::new());
        let service = CatalogService::new(
            Arc::new(mock),
            Arc::new(EpisodeReconciler::default()),
            Arc::clone(&bus),
        );
        (service, bus)
    }

    fn mock_title(id: AnimeId, videos: Vec<VideoEntry>) -> MockCatalogApi {
        let mut mock = MockCatalogApi::new();
        mock.expect_get_anime()
            .returning(move |anime_id| Ok(Some(api_anime(anime_id, "Frieren"))));
        mock.expect_list_videos()
            .withf(move |anime_id| *anime_id == id)
            .times(1)
            .returning(move |_| Ok(videos.clone()));
        mock
    }

    fn two_track_videos() -> Vec<VideoEntry> {
        vec![
            video(10, "Kodik", "1", "AniLibria"),
            video(11, "Kodik", "2", "AniLibria"),
            video(12, "Kodik", "3", "SHIZA"),
            video(20, "CVH", "1", "AniLibria"),
        ]
    }

    #[tokio::test]
    async fn test_title_details_groups_and_counts_first_track() {
        let (service, bus) = service_with(mock_title(5, two_track_videos()));

        let details = service.title_details(5).await.unwrap();

        assert_eq!(details.selected_dubbing.as_deref(), Some("AniLibria"));
        assert_eq!(details.anime.episodes, 2);
        assert_eq!(details.groups.len(), 2);
        assert_eq!(details.groups.get("SHIZA").unwrap()[0].video_id, 12);

        let log = bus.get_event_log();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].event_type, "TitleLoaded");
        assert_eq!(log[1].event_type, "EpisodesReconciled");
    }

    #[tokio::test]
    async fn test_title_details_reports_selected_player() {
        let (service, bus) = service_with(mock_title(5, two_track_videos()));

        let seen = Arc::new(std::sync::Mutex::new(None));
        let seen_clone = Arc::clone(&seen);
        bus.subscribe::<EpisodesReconciled, _>(move |event| {
            *seen_clone.lock().unwrap() = Some(event.clone());
        });

        service.title_details(5).await.unwrap();

        let event = seen.lock().unwrap().clone().unwrap();
        assert_eq!(event.selected_player.as_deref(), Some("Kodik"));
        assert_eq!(event.episode_count, 3);
        assert_eq!(event.dubbing_tracks, 2);
    }

    #[tokio::test]
    async fn test_title_details_missing_title_is_not_found() {
        let mut mock = MockCatalogApi::new();
        mock.expect_get_anime().returning(|_| Ok(None));
        mock.expect_list_videos().returning(|_| Ok(Vec::new()));
        let (service, _) = service_with(mock);

        let result = service.title_details(404).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_title_details_without_videos_has_no_dubbing() {
        let (service, _) = service_with(mock_title(8, Vec::new()));

        let details = service.title_details(8).await.unwrap();

        assert!(details.groups.is_empty());
        assert!(details.selected_dubbing.is_none());
        assert_eq!(details.anime.episodes, 0);
    }

    #[tokio::test]
    async fn test_title_override_applies_to_details() {
        let videos = vec![
            video(1, "Alloha", "1", "AniDUB"),
            video(2, "Alloha", "2", "AniDUB"),
            video(3, "Плеер Kodik", "1", "AniLibria"),
        ];
        let (service, _) = service_with(mock_title(1512, videos));

        let details = service.title_details(1512).await.unwrap();

        assert_eq!(details.selected_dubbing.as_deref(), Some("AniLibria"));
        assert_eq!(details.groups.episode_count(), 1);
    }

    #[tokio::test]
    async fn test_watch_positions_on_requested_video() {
        let (service, _) = service_with(mock_title(5, two_track_videos()));

        let session = service.watch(5, Some(11)).await.unwrap();

        assert!(!session.redirected);
        assert_eq!(session.selected_dubbing(), "AniLibria");
        assert_eq!(session.current().unwrap().video_id, 11);
        assert_eq!(session.previous().unwrap().video_id, 10);
        assert!(session.next().is_none());
    }

    #[tokio::test]
    async fn test_watch_unknown_video_redirects_to_first_episode() {
        let (service, _) = service_with(mock_title(5, two_track_videos()));

        // 20 belongs to the discarded CVH player
        let session = service.watch(5, Some(20)).await.unwrap();

        assert!(session.redirected);
        assert_eq!(session.current().unwrap().video_id, 10);
        assert!(session.previous().is_none());
        assert_eq!(session.next().unwrap().video_id, 11);
    }

    #[tokio::test]
    async fn test_watch_without_videos_is_not_found() {
        let (service, _) = service_with(mock_title(9, Vec::new()));

        let result = service.watch(9, None).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_search_skips_blank_queries() {
        let mut mock = MockCatalogApi::new();
        mock.expect_search().times(0);
        let (service, _) = service_with(mock);

        assert!(service.search("   ", 20, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_maps_titles() {
        let mut mock = MockCatalogApi::new();
        mock.expect_search()
            .withf(|query, limit, offset| query == "frieren" && *limit == 30 && *offset == 0)
            .returning(|_, _, _| Ok(vec![api_anime(1, "Frieren")]));
        let (service, _) = service_with(mock);

        let results = service.search("  frieren ", 30, 0).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Frieren");
        assert_eq!(results[0].episodes, 0);
    }

    #[tokio::test]
    async fn test_list_titles_propagates_api_errors() {
        let mut mock = MockCatalogApi::new();
        mock.expect_list_anime().returning(|| {
            Err(AppError::Api {
                status: 503,
                message: "Service Unavailable".to_string(),
            })
        });
        let (service, _) = service_with(mock);

        let result = service.list_titles().await;

        assert!(matches!(result, Err(AppError::Api { status: 503, .. })));
    }

    #[test]
    fn test_session_select_dubbing_moves_to_first_episode() {
        let groups = EpisodeReconciler::default().group_by_dubbing(&two_track_videos(), None);
        let anime = Anime::from_api(&api_anime(5, "Frieren"), 2);
        let mut session = WatchSession::new(anime, groups, Some(11)).unwrap();

        assert!(session.select_dubbing("SHIZA"));
        assert_eq!(session.current().unwrap().video_id, 12);
        assert!(session.next().is_none());

        assert!(!session.select_dubbing("Субтитры"));
        assert_eq!(session.selected_dubbing(), "SHIZA");
    }

    #[test]
    fn test_session_select_video_switches_track() {
        let groups = EpisodeReconciler::default().group_by_dubbing(&two_track_videos(), None);
        let anime = Anime::from_api(&api_anime(5, "Frieren"), 2);
        let mut session = WatchSession::new(anime, groups, None).unwrap();

        assert!(!session.redirected);
        assert!(session.select_video(12));
        assert_eq!(session.selected_dubbing(), "SHIZA");
        assert!(!session.select_video(999));
    }
}
