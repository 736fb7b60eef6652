pub mod entity;

pub use entity::{
    format_duration, parse_episode_number, VideoEntry, VideoId, VideoSource, UNKNOWN_DUBBING,
    UNKNOWN_PLAYER,
};
