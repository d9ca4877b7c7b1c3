//! Catalog records.
//!
//! Each record mirrors one table. Foreign keys are plain fields; related
//! records live in `Option` slots filled by include steps, and each record
//! exposes its navigations as associated constants for use with
//! [`Query::join`](crate::db::Query::join).

pub mod cast_member;
pub mod episode;
pub mod genre;
pub mod season;
pub mod series;

pub use cast_member::{CastMember, EpisodeCastMember};
pub use episode::Episode;
pub use genre::Genre;
pub use season::Season;
pub use series::Series;
