use serde::{Deserialize, Serialize};
use validator::Validate;

use super::CastMemberReadDto;
use crate::models::Episode;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeReadDto {
    pub id: i32,
    pub title: String,
    pub number: i32,
    pub season_id: i32,
    pub cast_members: Vec<CastMemberReadDto>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EpisodeCreateDto {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters."))]
    pub title: String,
    #[validate(range(min = 0, message = "Episode number cannot be negative."))]
    pub number: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EpisodeUpdateDto {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters."))]
    pub title: String,
    #[validate(range(min = 0, message = "Episode number cannot be negative."))]
    pub number: i32,
}

impl From<&Episode> for EpisodeReadDto {
    /// The cast list is flattened from the association rows to the cast
    /// members they link.
    fn from(episode: &Episode) -> Self {
        Self {
            id: episode.id,
            title: episode.title.clone(),
            number: episode.number,
            season_id: episode.season_id,
            cast_members: episode
                .cast
                .iter()
                .flatten()
                .filter_map(|link| link.cast_member.as_ref())
                .map(CastMemberReadDto::from)
                .collect(),
        }
    }
}

impl EpisodeCreateDto {
    #[must_use]
    pub fn into_record(self, season_id: i32) -> Episode {
        Episode {
            title: self.title,
            number: self.number,
            season_id,
            ..Episode::default()
        }
    }
}

impl EpisodeUpdateDto {
    pub fn apply_to(self, episode: &mut Episode) {
        episode.title = self.title;
        episode.number = self.number;
    }
}
