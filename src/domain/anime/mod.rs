pub mod entity;

pub use entity::{Anime, AnimeId, ApiAnime, Named, Poster, Rating, Titled};
