use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Users
        .route("/users", get(handlers::get_users))
        .route("/users", post(handlers::register_user))
        .route("/users/:user_id", get(handlers::get_user))
        .route("/login", post(handlers::login))
        // Movies
        .route("/movies", get(handlers::get_movies))
        .route("/movies", post(handlers::create_movie))
        .route("/movies/:movie_id", get(handlers::get_movie))
        // Ratings
        .route("/ratings", post(handlers::rate_movie))
        // Collaborative filtering
        .route(
            "/users/:user_id/similarity/:other_user_id",
            get(handlers::similarity),
        )
        .route(
            "/users/:user_id/predictions/:movie_id",
            get(handlers::predict_rating),
        )
        .with_state(state)
}
