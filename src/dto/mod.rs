//! Wire representations of catalog records and the mapping rules between
//! them.
//!
//! * Create DTOs become records by direct field copy; the id is left for the
//!   store to assign and parent ids come from the route.
//! * Records become read DTOs by direct field copy, except episodes whose
//!   cast list is flattened through the association rows.
//! * Update DTOs merge their fields onto an already loaded record, leaving
//!   its id and navigations untouched.

use std::borrow::Cow;

use validator::ValidationError;

use crate::domain::CastPosition;

pub mod cast_member;
pub mod episode;
pub mod genre;
pub mod season;
pub mod series;

pub use cast_member::{CastMemberCreateDto, CastMemberReadDto, CastMemberUpdateDto};
pub use episode::{EpisodeCreateDto, EpisodeReadDto, EpisodeUpdateDto};
pub use genre::{GenreCreateDto, GenreReadDto, GenreUpdateDto};
pub use season::{SeasonCreateDto, SeasonReadDto, SeasonUpdateDto};
pub use series::{SeriesCreateDto, SeriesReadDto, SeriesUpdateDto};

/// Rejects integers outside the declared [`CastPosition`] set.
pub(crate) fn validate_cast_position(position: i32) -> Result<(), ValidationError> {
    if CastPosition::is_known(position) {
        Ok(())
    } else {
        Err(ValidationError::new("cast_position").with_message(Cow::Owned(format!(
            "{position} is not a valid cast position."
        ))))
    }
}
