// src/cli.rs
//
// CLI arguments and command handlers.
//
// Handlers call the application commands and only format their DTOs.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use anicatalog::application::commands;
use anicatalog::application::dto::{AnimeDto, DubbingGroupDto, EpisodeDto, TitleDetailsDto, WatchDto};
use anicatalog::application::error_handling::ErrorResponse;
use anicatalog::application::state::AppState;
use anicatalog::domain::VideoEntry;

#[derive(Parser)]
#[command(name = "anicatalog")]
#[command(about = "Browse an anime catalog with one clean episode list per title")]
pub struct Cli {
    /// Catalog API root (overrides ANICATALOG_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds (overrides ANICATALOG_TIMEOUT_SECS)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Debug logging for anicatalog (RUST_LOG still wins)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List front-page titles
    List,
    /// Search titles by name
    Search {
        query: String,
        /// Results per page (1-30)
        #[arg(short, long)]
        limit: Option<u32>,
        #[arg(short, long)]
        offset: Option<u32>,
    },
    /// Show a title with its reconciled episodes
    Show {
        id: u64,
        /// Dubbing track to list episodes for
        #[arg(short, long)]
        dubbing: Option<String>,
    },
    /// Open the player view of a title
    Watch {
        id: u64,
        /// Video to start from (defaults to the first episode)
        video_id: Option<u64>,
        #[arg(short, long)]
        dubbing: Option<String>,
    },
    /// Reconcile a saved video list offline ("-" reads stdin)
    Reconcile {
        file: PathBuf,
        /// Title id, enables per-title player pinning
        #[arg(short, long)]
        title: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Text,
    Json,
}

/// Handle the CLI command
pub async fn handle_command(state: &AppState, command: Commands, output: Output) -> anyhow::Result<()> {
    match command {
        Commands::List => {
            let titles = commands::list_titles(state).await.map_err(command_error)?;
            emit(output, &titles, |titles| print_titles(titles))
        }
        Commands::Search { query, limit, offset } => {
            let titles = commands::search_titles(state, query, limit, offset)
                .await
                .map_err(command_error)?;
            emit(output, &titles, |titles| print_titles(titles))
        }
        Commands::Show { id, dubbing } => {
            let details = commands::get_title_details(state, id, dubbing)
                .await
                .map_err(command_error)?;
            emit(output, &details, print_details)
        }
        Commands::Watch { id, video_id, dubbing } => {
            let watch = commands::open_watch(state, id, video_id, dubbing)
                .await
                .map_err(command_error)?;
            emit(output, &watch, print_watch)
        }
        Commands::Reconcile { file, title } => {
            let videos = read_videos(&file).await?;
            let groups = commands::reconcile_videos(state, videos, title);
            emit(output, &groups, |groups: &Vec<DubbingGroupDto>| print_groups(groups, None))
        }
    }
}

// ============================================================================
// INPUT
// ============================================================================

/// A saved `/videos` response or just its array
#[derive(Deserialize)]
#[serde(untagged)]
enum RawVideos {
    List(Vec<VideoEntry>),
    Envelope { response: Vec<VideoEntry> },
}

async fn read_videos(file: &Path) -> anyhow::Result<Vec<VideoEntry>> {
    let raw = if file.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read videos from stdin")?;
        buffer
    } else {
        tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()))?
    };

    let videos = match serde_json::from_str::<RawVideos>(&raw)
        .context("Expected a JSON array of videos or a {\"response\": [...]} envelope")?
    {
        RawVideos::List(videos) | RawVideos::Envelope { response: videos } => videos,
    };

    log::info!("Read {} raw videos", videos.len());
    Ok(videos)
}

/// Turn a serialized ErrorResponse back into a readable error
fn command_error(raw: String) -> anyhow::Error {
    match serde_json::from_str::<ErrorResponse>(&raw) {
        Ok(response) => match response.details {
            Some(details) => anyhow!("{} ({})", response.message, details),
            None => anyhow!(response.message),
        },
        Err(_) => anyhow!(raw),
    }
}

// ============================================================================
// OUTPUT
// ============================================================================

fn emit<T, F>(output: Output, value: &T, print_text: F) -> anyhow::Result<()>
where
    T: Serialize,
    F: FnOnce(&T),
{
    match output {
        Output::Json => println!("{}", serde_json::to_string_pretty(value)?),
        Output::Text => print_text(value),
    }
    Ok(())
}

fn print_titles(titles: &[AnimeDto]) {
    if titles.is_empty() {
        println!("No titles found");
        return;
    }

    for anime in titles {
        println!(
            "{:>7}  {} ({}) [{}] {:.1}",
            anime.id, anime.title, anime.year, anime.status, anime.rating
        );
    }
}

fn print_details(details: &TitleDetailsDto) {
    let anime = &details.anime;
    println!("{} ({})", anime.title, anime.year);
    println!("Status: {}  Rating: {:.1}  Episodes: {}", anime.status, anime.rating, anime.episodes);
    if !anime.genres.is_empty() {
        println!("Genres: {}", anime.genres.join(", "));
    }
    if !anime.description.is_empty() {
        println!();
        println!("{}", anime.description);
    }
    println!();
    print_groups(&details.dubbings, details.selected_dubbing.as_deref());
}

fn print_watch(watch: &WatchDto) {
    if watch.redirected {
        println!("Requested video is not available, starting from the first episode");
    }
    println!("{} [{}]", watch.anime.title, watch.selected_dubbing);
    println!("Now:  {}", episode_line(&watch.current));
    if let Some(previous) = &watch.previous {
        println!("Prev: {}", episode_line(previous));
    }
    if let Some(next) = &watch.next {
        println!("Next: {}", episode_line(next));
    }

    let tracks: Vec<&str> = watch.dubbings.iter().map(|g| g.dubbing.as_str()).collect();
    if tracks.len() > 1 {
        println!("Dubbing: {}", tracks.join(" | "));
    }
}

/// All tracks with counts; episodes only for `selected` (or every track)
fn print_groups(groups: &[DubbingGroupDto], selected: Option<&str>) {
    if groups.is_empty() {
        println!("No episodes available");
        return;
    }

    for group in groups {
        let marker = if selected == Some(group.dubbing.as_str()) { "*" } else { " " };
        println!("{} {} ({} episodes)", marker, group.dubbing, group.episodes.len());

        if selected.is_none() || selected == Some(group.dubbing.as_str()) {
            for episode in &group.episodes {
                println!("    {}", episode_line(episode));
            }
        }
    }
}

fn episode_line(episode: &EpisodeDto) -> String {
    let mut line = format!("ep {:>4}  video {:<10} {}", episode.number, episode.video_id, episode.player);
    if let Some(duration) = &episode.duration {
        line.push_str(&format!("  {}", duration));
    }
    if let Some(url) = &episode.iframe_url {
        line.push_str(&format!("  {}", url));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_watch_with_globals() {
        let cli = Cli::try_parse_from([
            "anicatalog", "watch", "1512", "77", "--dubbing", "AniLibria", "--json",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Commands::Watch { id, video_id, dubbing } => {
                assert_eq!(id, 1512);
                assert_eq!(video_id, Some(77));
                assert_eq!(dubbing.as_deref(), Some("AniLibria"));
            }
            _ => panic!("expected watch"),
        }
    }

    #[test]
    fn test_raw_videos_accepts_array_and_envelope() {
        let array: RawVideos = serde_json::from_str(r#"[{"video_id": 1}]"#).unwrap();
        assert!(matches!(array, RawVideos::List(ref v) if v.len() == 1));

        let envelope: RawVideos =
            serde_json::from_str(r#"{"response": [{"video_id": 1}, {"video_id": 2}]}"#).unwrap();
        assert!(matches!(envelope, RawVideos::Envelope { ref response } if response.len() == 2));
    }

    #[test]
    fn test_command_error_reads_error_response() {
        let raw = ErrorResponse::not_found("Anime 5").to_json();
        assert_eq!(command_error(raw).to_string(), "Anime 5 not found");

        assert_eq!(command_error("plain".to_string()).to_string(), "plain");
    }
}
