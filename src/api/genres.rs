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
use crate::dto::{GenreCreateDto, GenreReadDto, GenreUpdateDto, SeriesReadDto};
use crate::models::{Genre, Series};

pub async fn list_genres(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<GenreReadDto>>, ApiError> {
    let genres = state.store().repository::<Genre>().get_all().all().await?;
    if genres.is_empty() {
        return Err(ApiError::NotFound("No genres".to_string()));
    }

    Ok(Json(genres.iter().map(GenreReadDto::from).collect()))
}

pub async fn get_genre(
    State(state): State<Arc<AppState>>,
    ValidatedPath(id): ValidatedPath<i32>,
) -> Result<Json<GenreReadDto>, ApiError> {
    let genre = state
        .store()
        .repository::<Genre>()
        .get_all()
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Genre", id))?;

    Ok(Json(GenreReadDto::from(&genre)))
}

/// GET /genres/{id}/series
/// Every series of the genre, each carrying its genre.
pub async fn list_genre_series(
    State(state): State<Arc<AppState>>,
    ValidatedPath(id): ValidatedPath<i32>,
) -> Result<Json<Vec<SeriesReadDto>>, ApiError> {
    let genre = state
        .store()
        .repository::<Genre>()
        .join(Genre::SERIES)
        .then_join(Series::GENRE)
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Genre", id))?;

    let series = genre.series.unwrap_or_default();
    Ok(Json(series.iter().map(SeriesReadDto::from).collect()))
}

pub async fn create_genre(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<GenreCreateDto>,
) -> Result<Response, ApiError> {
    let repo = state.store().repository::<Genre>();
    let mut session = state.store().session();

    let pending = repo.add(&mut session, Genre::from(payload));
    if !repo.save_changes(&mut session).await? {
        return Err(ApiError::not_saved("Genre"));
    }

    let genre = pending
        .get()
        .ok_or_else(|| ApiError::internal("Saved genre missing from session"))?;

    Ok(created(
        format!("/genres/{}", genre.id),
        GenreReadDto::from(&genre),
    ))
}

pub async fn update_genre(
    State(state): State<Arc<AppState>>,
    ValidatedPath(id): ValidatedPath<i32>,
    ValidatedJson(payload): ValidatedJson<GenreUpdateDto>,
) -> Result<StatusCode, ApiError> {
    let repo = state.store().repository::<Genre>();
    let mut genre = repo
        .get_all()
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Genre", id))?;

    payload.apply_to(&mut genre);

    let mut session = state.store().session();
    repo.update(&mut session, genre);
    if !repo.save_changes(&mut session).await? {
        return Err(ApiError::not_saved("Genre"));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /genres/{id}
/// Series of the genre go with it, along with everything below them.
pub async fn delete_genre(
    State(state): State<Arc<AppState>>,
    ValidatedPath(id): ValidatedPath<i32>,
) -> Result<StatusCode, ApiError> {
    let repo = state.store().repository::<Genre>();
    let genre = repo
        .get_all()
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Genre", id))?;

    let mut session = state.store().session();
    repo.delete(&mut session, genre);
    if !repo.save_changes(&mut session).await? {
        return Err(ApiError::not_saved("Genre"));
    }

    Ok(StatusCode::NO_CONTENT)
}
