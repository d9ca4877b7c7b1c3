pub mod prelude;

pub mod cast_members;
pub mod episode_casts;
pub mod episodes;
pub mod genres;
pub mod seasons;
pub mod series;
