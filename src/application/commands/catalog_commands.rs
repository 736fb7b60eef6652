// src/application/commands/catalog_commands.rs
//
// Catalog Command Handlers
//
// RULES:
// - Accept plain parameters
// - Call services
// - Return DTOs
// - Never contain business logic

use crate::application::{
    dto::*,
    error_handling::{ErrorResponse, ToErrorResponse},
    state::AppState,
};
use crate::domain::{TitleId, VideoEntry};

/// Used when the caller gives no search limit
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

/// List front-page titles
pub async fn list_titles(state: &AppState) -> Result<Vec<AnimeDto>, String> {
    let titles = state.catalog_service.list_titles().await.to_error_response()?;

    Ok(titles.into_iter().map(AnimeDto::from).collect())
}

/// Search titles by name
pub async fn search_titles(
    state: &AppState,
    query: String,
    limit: Option<u32>,
    offset: Option<u32>,
) -> Result<Vec<AnimeDto>, String> {
    let results = state
        .catalog_service
        .search(
            &query,
            limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
            offset.unwrap_or(0),
        )
        .await
        .to_error_response()?;

    Ok(results.into_iter().map(AnimeDto::from).collect())
}

/// Title page: metadata plus reconciled episodes per dubbing track
pub async fn get_title_details(
    state: &AppState,
    anime_id: u64,
    dubbing: Option<String>,
) -> Result<TitleDetailsDto, String> {
    let mut details = state
        .catalog_service
        .title_details(anime_id)
        .await
        .to_error_response()?;

    if let Some(track) = dubbing {
        if !details.groups.contains_track(&track) {
            return Err(unknown_dubbing(&track));
        }
        details.selected_dubbing = Some(track);
    }

    Ok(TitleDetailsDto::from(details))
}

/// Player page for a title, optionally on a given video and track
pub async fn open_watch(
    state: &AppState,
    anime_id: u64,
    video_id: Option<u64>,
    dubbing: Option<String>,
) -> Result<WatchDto, String> {
    let mut session = state
        .catalog_service
        .watch(anime_id, video_id)
        .await
        .to_error_response()?;

    if let Some(track) = dubbing {
        if track != session.selected_dubbing() && !session.select_dubbing(&track) {
            return Err(unknown_dubbing(&track));
        }
    }

    WatchDto::from_session(&session)
        .ok_or_else(|| ErrorResponse::not_found(&format!("Episodes of anime {}", anime_id)).to_json())
}

/// Reconcile an already fetched raw video list, without touching the network
pub fn reconcile_videos(
    state: &AppState,
    videos: Vec<VideoEntry>,
    title: Option<String>,
) -> Vec<DubbingGroupDto> {
    let title = title.map(TitleId::from);
    let groups = state.reconciler.group_by_dubbing(&videos, title.as_ref());

    groups.iter().map(DubbingGroupDto::from).collect()
}

fn unknown_dubbing(track: &str) -> String {
    ErrorResponse::validation(format!("Unknown dubbing track '{}'", track)).to_json()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::CatalogConfig;
    use crate::domain::ApiAnime;
    use crate::integrations::catalog::MockCatalogApi;

    fn video(id: u64, number: &str, dubbing: &str) -> VideoEntry {
        VideoEntry::new(id)
            .with_player("Kodik")
            .with_number(number)
            .with_dubbing(dubbing)
    }

    fn state_for_title() -> AppState {
        let mut mock = MockCatalogApi::new();
        mock.expect_get_anime().returning(|id| {
            Ok(Some(ApiAnime {
                anime_id: id,
                title: "Mushishi".to_string(),
                ..ApiAnime::default()
            }))
        });
        mock.expect_list_videos().returning(|_| {
            Ok(vec![
                video(1, "1", "AniLibria"),
                video(2, "2", "AniLibria"),
                video(3, "3", "Субтитры"),
            ])
        });

        AppState::with_api(CatalogConfig::default(), Arc::new(mock))
    }

    #[tokio::test]
    async fn test_title_details_honors_requested_dubbing() {
        let state = state_for_title();

        let dto = get_title_details(&state, 3, Some("Субтитры".to_string()))
            .await
            .unwrap();

        assert_eq!(dto.selected_dubbing.as_deref(), Some("Субтитры"));
        assert_eq!(dto.anime.episodes, 2);
        assert_eq!(dto.dubbings.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_dubbing_is_validation_error() {
        let state = state_for_title();

        let err = get_title_details(&state, 3, Some("SHIZA".to_string()))
            .await
            .unwrap_err();

        assert!(err.contains("\"validation\""));
    }

    #[tokio::test]
    async fn test_open_watch_switches_track() {
        let state = state_for_title();

        let dto = open_watch(&state, 3, Some(2), Some("Субтитры".to_string()))
            .await
            .unwrap();

        assert_eq!(dto.selected_dubbing, "Субтитры");
        assert_eq!(dto.current.video_id, 3);
        assert!(dto.previous.is_none());
        assert!(!dto.redirected);
    }

    #[tokio::test]
    async fn test_open_watch_keeps_position_when_track_unchanged() {
        let state = state_for_title();

        let dto = open_watch(&state, 3, Some(2), Some("AniLibria".to_string()))
            .await
            .unwrap();

        assert_eq!(dto.current.video_id, 2);
        assert_eq!(dto.previous.map(|e| e.video_id), Some(1));
    }

    #[tokio::test]
    async fn test_missing_title_maps_to_not_found_response() {
        let mut mock = MockCatalogApi::new();
        mock.expect_get_anime().returning(|_| Ok(None));
        mock.expect_list_videos().returning(|_| Ok(Vec::new()));
        let state = AppState::with_api(CatalogConfig::default(), Arc::new(mock));

        let err = get_title_details(&state, 77, None).await.unwrap_err();

        assert!(err.contains("not_found"));
        assert!(err.contains("Anime 77"));
    }

    #[test]
    fn test_reconcile_videos_offline() {
        let state = AppState::with_api(CatalogConfig::default(), Arc::new(MockCatalogApi::new()));
        let videos = vec![
            video(1, "1", "AniLibria").with_player("Alloha"),
            video(2, "1", "AniLibria").with_player("Alloha").with_views(9),
            VideoEntry::new(3).with_player("Плеер Kodik").with_number("1"),
        ];

        let groups = reconcile_videos(&state, videos.clone(), None);
        assert_eq!(groups[0].episodes[0].video_id, 2);

        let pinned = reconcile_videos(&state, videos, Some("1512".to_string()));
        assert_eq!(pinned[0].episodes[0].video_id, 3);
        assert_eq!(pinned[0].dubbing, "Unknown");
    }
}
