use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::Response,
};
use std::sync::Arc;

use super::types::created;
use super::validation::{ValidatedJson, ValidatedPath, ValidatedQuery};
use super::{ApiError, AppState};
use crate::db::Store;
use crate::dto::{SeriesCreateDto, SeriesReadDto, SeriesUpdateDto};
use crate::models::{Genre, Series};
use crate::services::SeriesQuery;

pub async fn list_series(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SeriesReadDto>>, ApiError> {
    let series = state
        .store()
        .repository::<Series>()
        .join(Series::GENRE)
        .all()
        .await?;
    if series.is_empty() {
        return Err(ApiError::NotFound("No series".to_string()));
    }

    Ok(Json(series.iter().map(SeriesReadDto::from).collect()))
}

/// GET /series/search?page=&filter=&sort=
pub async fn search_series(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<SeriesQuery>,
) -> Result<Json<Vec<SeriesReadDto>>, ApiError> {
    let series = state
        .store()
        .repository::<Series>()
        .join(Series::GENRE)
        .all()
        .await?;

    let page = query
        .apply(series, state.page_size())
        .ok_or_else(|| ApiError::NotFound(format!("No series for {query:?}")))?;

    Ok(Json(page.iter().map(SeriesReadDto::from).collect()))
}

pub async fn get_series(
    State(state): State<Arc<AppState>>,
    ValidatedPath(id): ValidatedPath<i32>,
) -> Result<Json<SeriesReadDto>, ApiError> {
    let series = state
        .store()
        .repository::<Series>()
        .join(Series::GENRE)
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Series", id))?;

    Ok(Json(SeriesReadDto::from(&series)))
}

pub async fn create_series(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<SeriesCreateDto>,
) -> Result<Response, ApiError> {
    let genre = require_genre(state.store(), payload.genre_id).await?;

    let repo = state.store().repository::<Series>();
    let mut session = state.store().session();

    let pending = repo.add(&mut session, Series::from(payload));
    if !repo.save_changes(&mut session).await? {
        return Err(ApiError::not_saved("Series"));
    }

    let mut series = pending
        .get()
        .ok_or_else(|| ApiError::internal("Saved series missing from session"))?;
    series.genre = Some(genre);

    Ok(created(
        format!("/series/{}", series.id),
        SeriesReadDto::from(&series),
    ))
}

pub async fn update_series(
    State(state): State<Arc<AppState>>,
    ValidatedPath(id): ValidatedPath<i32>,
    ValidatedJson(payload): ValidatedJson<SeriesUpdateDto>,
) -> Result<StatusCode, ApiError> {
    let repo = state.store().repository::<Series>();
    let mut series = repo
        .get_all()
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Series", id))?;

    require_genre(state.store(), payload.genre_id).await?;
    payload.apply_to(&mut series);

    let mut session = state.store().session();
    repo.update(&mut session, series);
    if !repo.save_changes(&mut session).await? {
        return Err(ApiError::not_saved("Series"));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_series(
    State(state): State<Arc<AppState>>,
    ValidatedPath(id): ValidatedPath<i32>,
) -> Result<StatusCode, ApiError> {
    let repo = state.store().repository::<Series>();
    let series = repo
        .get_all()
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Series", id))?;

    let mut session = state.store().session();
    repo.delete(&mut session, series);
    if !repo.save_changes(&mut session).await? {
        return Err(ApiError::not_saved("Series"));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Loads the genre a series points at, or fails on the `genreId` field.
async fn require_genre(store: &Store, genre_id: i32) -> Result<Genre, ApiError> {
    store
        .repository::<Genre>()
        .get_all()
        .find_by_id(genre_id)
        .await?
        .ok_or_else(|| ApiError::field("genreId", "Genre does not exist in database."))
}
