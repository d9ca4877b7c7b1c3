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
use crate::dto::{SeasonCreateDto, SeasonReadDto, SeasonUpdateDto};
use crate::models::{Season, Series};

const DUPLICATE_NUMBER: &str = "Duplicate season number for given series.";

async fn load_series(store: &Store, series_id: i32) -> Result<Series, ApiError> {
    store
        .repository::<Series>()
        .join(Series::SEASONS)
        .find_by_id(series_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Series", series_id))
}

fn find_season(series: &Series, season_id: i32) -> Result<&Season, ApiError> {
    series
        .season(season_id)
        .ok_or_else(|| ApiError::not_found("Season", season_id))
}

/// Whether another season of `series` already uses `number`.
fn number_taken(series: &Series, number: i32, except: Option<i32>) -> bool {
    series
        .seasons
        .iter()
        .flatten()
        .any(|season| season.number == number && Some(season.id) != except)
}

/// GET /series/{id}/seasons
pub async fn list_seasons(
    State(state): State<Arc<AppState>>,
    ValidatedPath(series_id): ValidatedPath<i32>,
) -> Result<Json<Vec<SeasonReadDto>>, ApiError> {
    let series = load_series(state.store(), series_id).await?;

    let mut seasons = series.seasons.unwrap_or_default();
    seasons.sort_by_key(|season| season.number);

    Ok(Json(seasons.iter().map(SeasonReadDto::from).collect()))
}

pub async fn get_season(
    State(state): State<Arc<AppState>>,
    ValidatedPath((series_id, season_id)): ValidatedPath<(i32, i32)>,
) -> Result<Json<SeasonReadDto>, ApiError> {
    let series = load_series(state.store(), series_id).await?;
    let season = find_season(&series, season_id)?;

    Ok(Json(SeasonReadDto::from(season)))
}

pub async fn create_season(
    State(state): State<Arc<AppState>>,
    ValidatedPath(series_id): ValidatedPath<i32>,
    ValidatedJson(payload): ValidatedJson<SeasonCreateDto>,
) -> Result<Response, ApiError> {
    let series = load_series(state.store(), series_id).await?;
    if number_taken(&series, payload.number, None) {
        return Err(ApiError::field("Number", DUPLICATE_NUMBER));
    }

    let repo = state.store().repository::<Season>();
    let mut session = state.store().session();

    let pending = repo.add(&mut session, payload.into_record(series.id));
    if !repo.save_changes(&mut session).await? {
        return Err(ApiError::not_saved("Season"));
    }

    let season = pending
        .get()
        .ok_or_else(|| ApiError::internal("Saved season missing from session"))?;

    Ok(created(
        format!("/series/{}/seasons/{}", series.id, season.id),
        SeasonReadDto::from(&season),
    ))
}

pub async fn update_season(
    State(state): State<Arc<AppState>>,
    ValidatedPath((series_id, season_id)): ValidatedPath<(i32, i32)>,
    ValidatedJson(payload): ValidatedJson<SeasonUpdateDto>,
) -> Result<StatusCode, ApiError> {
    let series = load_series(state.store(), series_id).await?;
    let mut season = find_season(&series, season_id)?.clone();

    if number_taken(&series, payload.number, Some(season.id)) {
        return Err(ApiError::field("Number", DUPLICATE_NUMBER));
    }
    payload.apply_to(&mut season);

    let repo = state.store().repository::<Season>();
    let mut session = state.store().session();
    repo.update(&mut session, season);
    if !repo.save_changes(&mut session).await? {
        return Err(ApiError::not_saved("Season"));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_season(
    State(state): State<Arc<AppState>>,
    ValidatedPath((series_id, season_id)): ValidatedPath<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    let series = load_series(state.store(), series_id).await?;
    let season = find_season(&series, season_id)?.clone();

    let repo = state.store().repository::<Season>();
    let mut session = state.store().session();
    repo.delete(&mut session, season);
    if !repo.save_changes(&mut session).await? {
        return Err(ApiError::not_saved("Season"));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series_with(numbers: &[(i32, i32)]) -> Series {
        Series {
            id: 1,
            seasons: Some(
                numbers
                    .iter()
                    .map(|&(id, number)| Season {
                        id,
                        number,
                        series_id: 1,
                        ..Season::default()
                    })
                    .collect(),
            ),
            ..Series::default()
        }
    }

    #[test]
    fn duplicate_number_detection() {
        let series = series_with(&[(10, 1), (11, 2)]);

        assert!(number_taken(&series, 2, None));
        assert!(!number_taken(&series, 3, None));
        // renumbering a season to its own number is not a clash
        assert!(!number_taken(&series, 2, Some(11)));
        assert!(number_taken(&series, 2, Some(10)));
    }

    #[test]
    fn unloaded_seasons_never_clash() {
        assert!(!number_taken(&Series::default(), 1, None));
    }
}
