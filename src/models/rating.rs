use std::collections::HashMap;

use uuid::Uuid;

use crate::services::predictor::RatingSource;

/// Lowest score a user may give a movie
pub const MIN_SCORE: u8 = 1;
/// Highest score a user may give a movie
pub const MAX_SCORE: u8 = 5;

/// Outcome of submitting a rating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingUpsert {
    /// The user had not rated this movie before
    Created,
    /// An existing score was replaced
    Updated,
}

/// All ratings in the system, indexed both by user and by movie
///
/// Invariant: at most one score per (user, movie) pair, and both indexes
/// always hold the same set of observations.
#[derive(Debug, Clone, Default)]
pub struct RatingBook {
    by_user: HashMap<Uuid, HashMap<Uuid, u8>>,
    by_movie: HashMap<Uuid, HashMap<Uuid, u8>>,
}

impl RatingBook {
    /// Creates an empty rating book
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a user's score for a movie, replacing any previous score
    pub fn rate(&mut self, user_id: Uuid, movie_id: Uuid, score: u8) -> RatingUpsert {
        let previous = self
            .by_user
            .entry(user_id)
            .or_default()
            .insert(movie_id, score);
        self.by_movie
            .entry(movie_id)
            .or_default()
            .insert(user_id, score);

        match previous {
            Some(_) => RatingUpsert::Updated,
            None => RatingUpsert::Created,
        }
    }

    /// Returns a user's score for a movie, if they have rated it
    pub fn score(&self, user_id: Uuid, movie_id: Uuid) -> Option<u8> {
        self.by_user.get(&user_id)?.get(&movie_id).copied()
    }

    /// Returns all (movie, score) observations for a user
    pub fn scores_by_user(&self, user_id: Uuid) -> Vec<(Uuid, u8)> {
        self.by_user
            .get(&user_id)
            .map(|scores| scores.iter().map(|(movie, score)| (*movie, *score)).collect())
            .unwrap_or_default()
    }

    /// Returns all (user, score) observations for a movie
    pub fn scores_by_movie(&self, movie_id: Uuid) -> Vec<(Uuid, u8)> {
        self.by_movie
            .get(&movie_id)
            .map(|scores| scores.iter().map(|(user, score)| (*user, *score)).collect())
            .unwrap_or_default()
    }

    /// Returns the mean score for a movie, or `None` if it has no ratings
    pub fn mean_score_for_movie(&self, movie_id: Uuid) -> Option<f64> {
        let scores = self.by_movie.get(&movie_id)?;
        if scores.is_empty() {
            return None;
        }
        let total: u32 = scores.values().map(|score| u32::from(*score)).sum();
        Some(f64::from(total) / scores.len() as f64)
    }
}

impl RatingSource for RatingBook {
    fn ratings_for_user(&self, user_id: Uuid) -> Vec<(Uuid, f64)> {
        self.scores_by_user(user_id)
            .into_iter()
            .map(|(movie, score)| (movie, f64::from(score)))
            .collect()
    }

    fn ratings_for_movie(&self, movie_id: Uuid) -> Vec<(Uuid, f64)> {
        self.scores_by_movie(movie_id)
            .into_iter()
            .map(|(user, score)| (user, f64::from(score)))
            .collect()
    }

    fn rating(&self, user_id: Uuid, movie_id: Uuid) -> Option<f64> {
        self.score(user_id, movie_id).map(f64::from)
    }
}
