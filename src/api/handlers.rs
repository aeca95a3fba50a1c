use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Movie, RatingUpsert, User, MAX_SCORE, MIN_SCORE};
use crate::services::Predictor;

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub age: Option<u8>,
    pub zipcode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub age: Option<u8>,
    pub zipcode: Option<String>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            age: user.age,
            zipcode: user.zipcode.clone(),
        }
    }
}

/// One rated movie in a user detail response
#[derive(Debug, Serialize)]
pub struct RatedMovie {
    pub movie_id: Uuid,
    pub title: String,
    pub score: u8,
}

#[derive(Debug, Serialize)]
pub struct UserDetailResponse {
    pub id: Uuid,
    pub email: String,
    pub age: Option<u8>,
    pub zipcode: Option<String>,
    pub ratings: Vec<RatedMovie>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMovieRequest {
    pub title: String,
    pub released_at: Option<DateTime<Utc>>,
    pub imdb_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub id: Uuid,
    pub title: String,
    pub released_at: Option<DateTime<Utc>>,
    pub imdb_url: Option<String>,
}

impl From<&Movie> for MovieResponse {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            released_at: movie.released_at,
            imdb_url: movie.imdb_url.clone(),
        }
    }
}

/// One user's score in a movie detail response
#[derive(Debug, Serialize)]
pub struct MovieRating {
    pub user_id: Uuid,
    pub score: u8,
}

#[derive(Debug, Serialize)]
pub struct MovieDetailResponse {
    pub id: Uuid,
    pub title: String,
    pub released_at: Option<DateTime<Utc>>,
    pub imdb_url: Option<String>,
    pub mean_score: Option<f64>,
    pub ratings: Vec<MovieRating>,
}

#[derive(Debug, Deserialize)]
pub struct RateMovieRequest {
    pub user_id: Uuid,
    pub movie_id: Uuid,
    pub score: u8,
}

#[derive(Debug, Serialize)]
pub struct RatingResponse {
    pub user_id: Uuid,
    pub movie_id: Uuid,
    pub score: u8,
}

#[derive(Debug, Serialize)]
pub struct SimilarityResponse {
    pub user_id: Uuid,
    pub other_user_id: Uuid,
    pub similarity: f64,
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub user_id: Uuid,
    pub movie_id: Uuid,
    /// `null` when no positive-similarity rater exists for the movie
    pub predicted_score: Option<f64>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Get all users
pub async fn get_users(State(state): State<AppState>) -> Json<Vec<UserResponse>> {
    let inner = state.inner.read().await;
    let users: Vec<UserResponse> = inner.users.values().map(UserResponse::from).collect();
    Json(users)
}

/// Register a new user
pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let mut inner = state.inner.write().await;

    if inner.users.values().any(|u| u.email == request.email) {
        return Err(AppError::Conflict(format!(
            "A user with email {} already exists",
            request.email
        )));
    }

    let user = User::new(request.email, request.password, request.age, request.zipcode);
    let response = UserResponse::from(&user);

    tracing::info!(user_id = %user.id, "Registered new user");
    inner.users.insert(user.id, user);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Get a user with all the ratings they have submitted
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<UserDetailResponse>> {
    let inner = state.inner.read().await;

    let user = inner
        .users
        .get(&user_id)
        .ok_or_else(|| AppError::NotFound(format!("No user with id {}", user_id)))?;

    let ratings: Vec<RatedMovie> = inner
        .ratings
        .scores_by_user(user_id)
        .into_iter()
        .filter_map(|(movie_id, score)| {
            inner.movies.get(&movie_id).map(|movie| RatedMovie {
                movie_id,
                title: movie.title.clone(),
                score,
            })
        })
        .collect();

    Ok(Json(UserDetailResponse {
        id: user.id,
        email: user.email.clone(),
        age: user.age,
        zipcode: user.zipcode.clone(),
        ratings,
    }))
}

/// Check a user's credentials
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<UserResponse>> {
    let inner = state.inner.read().await;

    let user = inner
        .users
        .values()
        .find(|u| u.email == request.email)
        .ok_or_else(|| AppError::NotFound("Email not registered".to_string()))?;

    if user.password != request.password {
        return Err(AppError::Unauthorized("Incorrect password".to_string()));
    }

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(Json(UserResponse::from(user)))
}

/// Get all movies, ordered by title
pub async fn get_movies(State(state): State<AppState>) -> Json<Vec<MovieResponse>> {
    let inner = state.inner.read().await;
    let mut movies: Vec<MovieResponse> = inner.movies.values().map(MovieResponse::from).collect();
    movies.sort_by(|a, b| a.title.cmp(&b.title));
    Json(movies)
}

/// Create a new movie
pub async fn create_movie(
    State(state): State<AppState>,
    Json(request): Json<CreateMovieRequest>,
) -> (StatusCode, Json<MovieResponse>) {
    let movie = Movie::new(request.title, request.released_at, request.imdb_url);
    let response = MovieResponse::from(&movie);

    let mut inner = state.inner.write().await;
    inner.movies.insert(movie.id, movie);

    (StatusCode::CREATED, Json(response))
}

/// Get a movie with its ratings and mean score
pub async fn get_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<Uuid>,
) -> AppResult<Json<MovieDetailResponse>> {
    let inner = state.inner.read().await;

    let movie = inner
        .movies
        .get(&movie_id)
        .ok_or_else(|| AppError::NotFound(format!("No movie with id {}", movie_id)))?;

    let ratings: Vec<MovieRating> = inner
        .ratings
        .scores_by_movie(movie_id)
        .into_iter()
        .map(|(user_id, score)| MovieRating { user_id, score })
        .collect();

    Ok(Json(MovieDetailResponse {
        id: movie.id,
        title: movie.title.clone(),
        released_at: movie.released_at,
        imdb_url: movie.imdb_url.clone(),
        mean_score: inner.ratings.mean_score_for_movie(movie_id),
        ratings,
    }))
}

/// Submit or update a user's rating of a movie
pub async fn rate_movie(
    State(state): State<AppState>,
    Json(request): Json<RateMovieRequest>,
) -> AppResult<(StatusCode, Json<RatingResponse>)> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&request.score) {
        return Err(AppError::InvalidInput(format!(
            "Score must be between {} and {}",
            MIN_SCORE, MAX_SCORE
        )));
    }

    let mut inner = state.inner.write().await;

    if !inner.users.contains_key(&request.user_id) {
        return Err(AppError::NotFound(format!(
            "No user with id {}",
            request.user_id
        )));
    }
    if !inner.movies.contains_key(&request.movie_id) {
        return Err(AppError::NotFound(format!(
            "No movie with id {}",
            request.movie_id
        )));
    }

    let outcome = inner
        .ratings
        .rate(request.user_id, request.movie_id, request.score);
    let updated = outcome == RatingUpsert::Updated;

    tracing::info!(
        user_id = %request.user_id,
        movie_id = %request.movie_id,
        score = request.score,
        updated,
        "Rating recorded"
    );

    let status = match outcome {
        RatingUpsert::Created => StatusCode::CREATED,
        RatingUpsert::Updated => StatusCode::OK,
    };

    let response = RatingResponse {
        user_id: request.user_id,
        movie_id: request.movie_id,
        score: request.score,
    };

    Ok((status, Json(response)))
}

/// Compute the Pearson similarity between two users' rating histories
pub async fn similarity(
    State(state): State<AppState>,
    Path((user_id, other_user_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<SimilarityResponse>> {
    let inner = state.inner.read().await;

    for id in [user_id, other_user_id] {
        if !inner.users.contains_key(&id) {
            return Err(AppError::NotFound(format!("No user with id {}", id)));
        }
    }

    let predictor = Predictor::new(&inner.ratings);
    let similarity = predictor.similarity(user_id, other_user_id);

    Ok(Json(SimilarityResponse {
        user_id,
        other_user_id,
        similarity,
    }))
}

/// Predict a user's rating for a movie from similar users' scores
pub async fn predict_rating(
    State(state): State<AppState>,
    Path((user_id, movie_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<PredictionResponse>> {
    let inner = state.inner.read().await;

    if !inner.users.contains_key(&user_id) {
        return Err(AppError::NotFound(format!("No user with id {}", user_id)));
    }
    if !inner.movies.contains_key(&movie_id) {
        return Err(AppError::NotFound(format!("No movie with id {}", movie_id)));
    }

    let predictor = Predictor::new(&inner.ratings);
    let predicted_score = predictor.predict(user_id, movie_id);

    tracing::debug!(
        user_id = %user_id,
        movie_id = %movie_id,
        predicted = ?predicted_score,
        "Computed rating prediction"
    );

    Ok(Json(PredictionResponse {
        user_id,
        movie_id,
        predicted_score,
    }))
}
