use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::Response,
};
use std::sync::Arc;

use super::types::created;
use super::validation::{ValidatedJson, ValidatedPath};
use super::{ApiError, AppState};
use crate::db::Store;
use crate::dto::{EpisodeCreateDto, EpisodeReadDto, EpisodeUpdateDto};
use crate::models::{CastMember, Episode, EpisodeCastMember, Season, Series};

const DUPLICATE_NUMBER: &str = "Duplicate episode number for the season.";

/// Loads one season of a series with its episodes and their cast.
async fn load_season(store: &Store, series_id: i32, season_id: i32) -> Result<Season, ApiError> {
    let series = store
        .repository::<Series>()
        .join(Series::SEASONS)
        .then_join(Season::EPISODES)
        .then_join(Episode::CAST)
        .then_join(EpisodeCastMember::CAST_MEMBER)
        .find_by_id(series_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Series", series_id))?;

    series
        .seasons
        .into_iter()
        .flatten()
        .find(|season| season.id == season_id)
        .ok_or_else(|| ApiError::not_found("Season", season_id))
}

fn take_episode(season: Season, episode_id: i32) -> Result<Episode, ApiError> {
    season
        .episodes
        .into_iter()
        .flatten()
        .find(|episode| episode.id == episode_id)
        .ok_or_else(|| ApiError::not_found("Episode", episode_id))
}

fn number_taken(season: &Season, number: i32, except: Option<i32>) -> bool {
    season
        .episodes
        .iter()
        .flatten()
        .any(|episode| episode.number == number && Some(episode.id) != except)
}

fn episode_location(series_id: i32, episode: &Episode) -> String {
    format!(
        "/series/{}/seasons/{}/episodes/{}",
        series_id, episode.season_id, episode.id
    )
}

/// GET /series/{id}/seasons/{seasonId}/episodes
pub async fn list_episodes(
    State(state): State<Arc<AppState>>,
    ValidatedPath((series_id, season_id)): ValidatedPath<(i32, i32)>,
) -> Result<Json<Vec<EpisodeReadDto>>, ApiError> {
    let season = load_season(state.store(), series_id, season_id).await?;

    let mut episodes = season.episodes.unwrap_or_default();
    episodes.sort_by_key(|episode| episode.number);

    Ok(Json(episodes.iter().map(EpisodeReadDto::from).collect()))
}

pub async fn get_episode(
    State(state): State<Arc<AppState>>,
    ValidatedPath((series_id, season_id, episode_id)): ValidatedPath<(i32, i32, i32)>,
) -> Result<Json<EpisodeReadDto>, ApiError> {
    let season = load_season(state.store(), series_id, season_id).await?;
    let episode = take_episode(season, episode_id)?;

    Ok(Json(EpisodeReadDto::from(&episode)))
}

pub async fn create_episode(
    State(state): State<Arc<AppState>>,
    ValidatedPath((series_id, season_id)): ValidatedPath<(i32, i32)>,
    ValidatedJson(payload): ValidatedJson<EpisodeCreateDto>,
) -> Result<Response, ApiError> {
    let season = load_season(state.store(), series_id, season_id).await?;
    if number_taken(&season, payload.number, None) {
        return Err(ApiError::field("Number", DUPLICATE_NUMBER));
    }

    let repo = state.store().repository::<Episode>();
    let mut session = state.store().session();

    let pending = repo.add(&mut session, payload.into_record(season.id));
    if !repo.save_changes(&mut session).await? {
        return Err(ApiError::not_saved("Episode"));
    }

    let episode = pending
        .get()
        .ok_or_else(|| ApiError::internal("Saved episode missing from session"))?;

    Ok(created(
        episode_location(series_id, &episode),
        EpisodeReadDto::from(&episode),
    ))
}

pub async fn update_episode(
    State(state): State<Arc<AppState>>,
    ValidatedPath((series_id, season_id, episode_id)): ValidatedPath<(i32, i32, i32)>,
    ValidatedJson(payload): ValidatedJson<EpisodeUpdateDto>,
) -> Result<StatusCode, ApiError> {
    let season = load_season(state.store(), series_id, season_id).await?;
    let clash = number_taken(&season, payload.number, Some(episode_id));

    let mut episode = take_episode(season, episode_id)?;
    if clash {
        return Err(ApiError::field("Number", DUPLICATE_NUMBER));
    }
    payload.apply_to(&mut episode);

    let repo = state.store().repository::<Episode>();
    let mut session = state.store().session();
    repo.update(&mut session, episode);
    if !repo.save_changes(&mut session).await? {
        return Err(ApiError::not_saved("Episode"));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_episode(
    State(state): State<Arc<AppState>>,
    ValidatedPath((series_id, season_id, episode_id)): ValidatedPath<(i32, i32, i32)>,
) -> Result<StatusCode, ApiError> {
    let season = load_season(state.store(), series_id, season_id).await?;
    let episode = take_episode(season, episode_id)?;

    let repo = state.store().repository::<Episode>();
    let mut session = state.store().session();
    repo.delete(&mut session, episode);
    if !repo.save_changes(&mut session).await? {
        return Err(ApiError::not_saved("Episode"));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// POST /series/{id}/seasons/{seasonId}/episodes/{episodeId}/cast/{castMemberId}
/// Links a cast member to the episode and returns the updated episode.
pub async fn add_episode_cast(
    State(state): State<Arc<AppState>>,
    ValidatedPath((series_id, season_id, episode_id, cast_member_id)): ValidatedPath<(i32, i32, i32, i32)>,
) -> Result<Response, ApiError> {
    let season = load_season(state.store(), series_id, season_id).await?;
    let mut episode = take_episode(season, episode_id)?;

    let member = state
        .store()
        .repository::<CastMember>()
        .get_all()
        .find_by_id(cast_member_id)
        .await?
        .ok_or_else(|| {
            ApiError::field("castMemberId", "Cast member does not exist in database.")
        })?;

    let cast = episode.cast.get_or_insert_with(Vec::new);
    if cast.iter().any(|link| link.cast_member_id == member.id) {
        return Err(ApiError::field(
            "castMemberId",
            "Cast member already appears in the episode.",
        ));
    }

    let repo = state.store().repository::<EpisodeCastMember>();
    let mut session = state.store().session();

    let pending = repo.add(&mut session, EpisodeCastMember::new(episode.id, member.id));
    if !repo.save_changes(&mut session).await? {
        return Err(ApiError::not_saved("Episode cast"));
    }

    let mut link = pending
        .get()
        .ok_or_else(|| ApiError::internal("Saved episode cast missing from session"))?;
    link.cast_member = Some(member);
    cast.push(link);

    Ok(created(
        episode_location(series_id, &episode),
        EpisodeReadDto::from(&episode),
    ))
}

/// DELETE /series/{id}/seasons/{seasonId}/episodes/{episodeId}/cast/{castMemberId}
pub async fn remove_episode_cast(
    State(state): State<Arc<AppState>>,
    ValidatedPath((series_id, season_id, episode_id, cast_member_id)): ValidatedPath<(i32, i32, i32, i32)>,
) -> Result<StatusCode, ApiError> {
    let season = load_season(state.store(), series_id, season_id).await?;
    let episode = take_episode(season, episode_id)?;

    let link = episode
        .cast
        .into_iter()
        .flatten()
        .find(|link| link.cast_member_id == cast_member_id)
        .ok_or_else(|| ApiError::not_found("Episode cast member", cast_member_id))?;

    let repo = state.store().repository::<EpisodeCastMember>();
    let mut session = state.store().session();
    repo.delete(&mut session, link);
    if !repo.save_changes(&mut session).await? {
        return Err(ApiError::not_saved("Episode cast"));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn season_with(episodes: &[(i32, i32)]) -> Season {
        Season {
            id: 3,
            episodes: Some(
                episodes
                    .iter()
                    .map(|&(id, number)| Episode {
                        id,
                        number,
                        season_id: 3,
                        ..Episode::default()
                    })
                    .collect(),
            ),
            ..Season::default()
        }
    }

    #[test]
    fn episode_numbers_are_unique_per_season() {
        let season = season_with(&[(1, 0), (2, 1)]);

        assert!(number_taken(&season, 0, None));
        assert!(!number_taken(&season, 5, None));
        assert!(!number_taken(&season, 1, Some(2)));
    }

    #[test]
    fn take_episode_reports_missing() {
        let season = season_with(&[(1, 0)]);
        assert!(matches!(
            take_episode(season.clone(), 9),
            Err(ApiError::NotFound(_))
        ));
        assert_eq!(take_episode(season, 1).unwrap().number, 0);
    }

    #[test]
    fn location_uses_episode_season() {
        let episode = Episode {
            id: 8,
            season_id: 3,
            ..Episode::default()
        };
        assert_eq!(
            episode_location(2, &episode),
            "/series/2/seasons/3/episodes/8"
        );
    }
}
