use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::Response,
};
use std::collections::HashSet;
use std::sync::Arc;

use super::types::created;
use super::validation::{ValidatedJson, ValidatedPath};
use super::{ApiError, AppState};
use crate::dto::{CastMemberCreateDto, CastMemberReadDto, CastMemberUpdateDto, SeriesReadDto};
use crate::models::{CastMember, Episode, EpisodeCastMember, Season, Series};

pub async fn list_cast(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CastMemberReadDto>>, ApiError> {
    let members = state
        .store()
        .repository::<CastMember>()
        .get_all()
        .all()
        .await?;
    if members.is_empty() {
        return Err(ApiError::NotFound("No cast members".to_string()));
    }

    Ok(Json(members.iter().map(CastMemberReadDto::from).collect()))
}

pub async fn get_cast_member(
    State(state): State<Arc<AppState>>,
    ValidatedPath(id): ValidatedPath<i32>,
) -> Result<Json<CastMemberReadDto>, ApiError> {
    let member = state
        .store()
        .repository::<CastMember>()
        .get_all()
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Cast member", id))?;

    Ok(Json(CastMemberReadDto::from(&member)))
}

/// GET /cast/{id}/series
/// Distinct series the member appears in, in order of first appearance.
pub async fn list_cast_series(
    State(state): State<Arc<AppState>>,
    ValidatedPath(id): ValidatedPath<i32>,
) -> Result<Json<Vec<SeriesReadDto>>, ApiError> {
    let member = state
        .store()
        .repository::<CastMember>()
        .join(CastMember::APPEARANCES)
        .then_join(EpisodeCastMember::EPISODE)
        .then_join(Episode::SEASON)
        .then_join(Season::SERIES)
        .then_join(Series::GENRE)
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Cast member", id))?;

    let series = appeared_in(&member);
    if series.is_empty() {
        return Err(ApiError::NotFound(format!("No series for cast member {id}")));
    }

    Ok(Json(series.into_iter().map(SeriesReadDto::from).collect()))
}

fn appeared_in(member: &CastMember) -> Vec<&Series> {
    let mut seen = HashSet::new();
    member
        .appearances
        .iter()
        .flatten()
        .filter_map(|link| link.episode.as_ref())
        .filter_map(|episode| episode.season.as_ref())
        .filter_map(|season| season.series.as_ref())
        .filter(|series| seen.insert(series.id))
        .collect()
}

pub async fn create_cast_member(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<CastMemberCreateDto>,
) -> Result<Response, ApiError> {
    let repo = state.store().repository::<CastMember>();
    let mut session = state.store().session();

    let pending = repo.add(&mut session, CastMember::try_from(payload)?);
    if !repo.save_changes(&mut session).await? {
        return Err(ApiError::not_saved("Cast member"));
    }

    let member = pending
        .get()
        .ok_or_else(|| ApiError::internal("Saved cast member missing from session"))?;

    Ok(created(
        format!("/cast/{}", member.id),
        CastMemberReadDto::from(&member),
    ))
}

pub async fn update_cast_member(
    State(state): State<Arc<AppState>>,
    ValidatedPath(id): ValidatedPath<i32>,
    ValidatedJson(payload): ValidatedJson<CastMemberUpdateDto>,
) -> Result<StatusCode, ApiError> {
    let repo = state.store().repository::<CastMember>();
    let mut member = repo
        .get_all()
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Cast member", id))?;

    payload.apply_to(&mut member)?;

    let mut session = state.store().session();
    repo.update(&mut session, member);
    if !repo.save_changes(&mut session).await? {
        return Err(ApiError::not_saved("Cast member"));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_cast_member(
    State(state): State<Arc<AppState>>,
    ValidatedPath(id): ValidatedPath<i32>,
) -> Result<StatusCode, ApiError> {
    let repo = state.store().repository::<CastMember>();
    let member = repo
        .get_all()
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Cast member", id))?;

    let mut session = state.store().session();
    repo.delete(&mut session, member);
    if !repo.save_changes(&mut session).await? {
        return Err(ApiError::not_saved("Cast member"));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appearance(series_id: i32) -> EpisodeCastMember {
        let series = Series {
            id: series_id,
            title: format!("Series {series_id}"),
            ..Series::default()
        };
        let season = Season {
            series_id,
            series: Some(series),
            ..Season::default()
        };
        EpisodeCastMember {
            episode: Some(Episode {
                season: Some(season),
                ..Episode::default()
            }),
            ..EpisodeCastMember::default()
        }
    }

    #[test]
    fn appearances_collapse_to_distinct_series() {
        let member = CastMember {
            appearances: Some(vec![appearance(2), appearance(1), appearance(2)]),
            ..CastMember::default()
        };

        let ids: Vec<i32> = appeared_in(&member).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn unloaded_appearances_yield_nothing() {
        assert!(appeared_in(&CastMember::default()).is_empty());
    }
}
