pub mod auth_service;
pub mod auth_service_impl;
pub mod query;

pub use auth_service::{AuthError, AuthService, Claims, IssuedToken};
pub use auth_service_impl::JwtAuthService;
pub use query::{SeriesQuery, Titled};
