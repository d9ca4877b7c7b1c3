use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::SharedState;

pub mod auth;
mod cast;
mod episodes;
mod error;
mod genres;
mod observability;
mod seasons;
mod series;
mod types;
pub mod validation;

pub use error::ApiError;
pub use types::*;

use crate::services::AuthService;
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn auth_service(&self) -> &dyn AuthService {
        self.shared.auth.as_ref()
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.shared.config.catalog.series_page_size
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let protected_routes = create_protected_router(state.clone());

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/auth/login", post(auth::login))
        .route("/genres", get(genres::list_genres))
        .route("/genres/{id}", get(genres::get_genre))
        .route("/genres/{id}/series", get(genres::list_genre_series))
        .route("/series", get(series::list_series))
        .route("/series/search", get(series::search_series))
        .route("/series/{id}", get(series::get_series))
        .route("/series/{id}/seasons", get(seasons::list_seasons))
        .route(
            "/series/{id}/seasons/{season_id}",
            get(seasons::get_season),
        )
        .route(
            "/series/{id}/seasons/{season_id}/episodes",
            get(episodes::list_episodes),
        )
        .route(
            "/series/{id}/seasons/{season_id}/episodes/{episode_id}",
            get(episodes::get_episode),
        )
        .route("/cast", get(cast::list_cast))
        .route("/cast/{id}", get(cast::get_cast_member))
        .route("/cast/{id}/series", get(cast::list_cast_series))
        .route("/health", get(observability::health))
        .route("/metrics", get(observability::get_metrics))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    api_router
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

/// Mutating routes; every request must carry a valid bearer token.
fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/genres", post(genres::create_genre))
        .route(
            "/genres/{id}",
            axum::routing::put(genres::update_genre).delete(genres::delete_genre),
        )
        .route("/series", post(series::create_series))
        .route(
            "/series/{id}",
            axum::routing::put(series::update_series).delete(series::delete_series),
        )
        .route("/series/{id}/seasons", post(seasons::create_season))
        .route(
            "/series/{id}/seasons/{season_id}",
            axum::routing::put(seasons::update_season).delete(seasons::delete_season),
        )
        .route(
            "/series/{id}/seasons/{season_id}/episodes",
            post(episodes::create_episode),
        )
        .route(
            "/series/{id}/seasons/{season_id}/episodes/{episode_id}",
            axum::routing::put(episodes::update_episode).delete(episodes::delete_episode),
        )
        .route(
            "/series/{id}/seasons/{season_id}/episodes/{episode_id}/cast/{cast_member_id}",
            post(episodes::add_episode_cast).delete(episodes::remove_episode_cast),
        )
        .route("/cast", post(cast::create_cast_member))
        .route(
            "/cast/{id}",
            axum::routing::put(cast::update_cast_member).delete(cast::delete_cast_member),
        )
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::auth_middleware,
        ))
}
