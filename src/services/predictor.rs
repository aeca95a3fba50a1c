use std::cmp::Ordering;

use uuid::Uuid;

use super::correlation;

/// Read-only view of the rating data a prediction operates over
///
/// The predictor never mutates ratings and holds no state of its own; each
/// call is a pure function of the snapshot behind this trait.
pub trait RatingSource {
    /// All (movie, score) observations for a user
    fn ratings_for_user(&self, user_id: Uuid) -> Vec<(Uuid, f64)>;

    /// All (user, score) observations for a movie
    fn ratings_for_movie(&self, movie_id: Uuid) -> Vec<(Uuid, f64)>;

    /// A user's score for a specific movie, if they have rated it
    fn rating(&self, user_id: Uuid, movie_id: Uuid) -> Option<f64>;
}

/// Memory-based collaborative filtering over a rating snapshot
///
/// Similarity between users is the Pearson coefficient over their shared
/// ratings; a missing rating is predicted as the similarity-weighted mean of
/// other users' scores for the same movie.
pub struct Predictor<'a> {
    ratings: &'a dyn RatingSource,
}

impl<'a> Predictor<'a> {
    /// Creates a predictor over the given rating snapshot
    pub fn new(ratings: &'a dyn RatingSource) -> Self {
        Self { ratings }
    }

    /// Computes how similarly two users rate the movies they share
    ///
    /// Pairs up the scores both users gave to the same movies and returns
    /// their Pearson coefficient. Users with no shared movies have
    /// similarity `0.0`. Symmetric in its arguments.
    pub fn similarity(&self, user_a: Uuid, user_b: Uuid) -> f64 {
        let mut paired_ratings = Vec::new();

        for (movie_id, their_score) in self.ratings.ratings_for_user(user_b) {
            if let Some(our_score) = self.ratings.rating(user_a, movie_id) {
                paired_ratings.push((our_score, their_score));
            }
        }

        if paired_ratings.is_empty() {
            return 0.0;
        }

        correlation::pearson(&paired_ratings)
    }

    /// Predicts a user's score for a movie they have not rated
    ///
    /// Weighs every other rater's score by their similarity to the user,
    /// keeping only strictly positive similarities. Returns `None` when the
    /// movie has no raters or none of them resemble the user — insufficient
    /// data, not an error.
    pub fn predict(&self, user_id: Uuid, movie_id: Uuid) -> Option<f64> {
        let mut similarities: Vec<(f64, f64)> = self
            .ratings
            .ratings_for_movie(movie_id)
            .into_iter()
            .filter(|(rater_id, _)| *rater_id != user_id)
            .map(|(rater_id, score)| (self.similarity(user_id, rater_id), score))
            .filter(|(sim, _)| *sim > 0.0)
            .collect();

        if similarities.is_empty() {
            return None;
        }

        similarities.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

        let numerator: f64 = similarities.iter().map(|(sim, score)| sim * score).sum();
        let denominator: f64 = similarities.iter().map(|(sim, _)| sim).sum();

        Some(numerator / denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RatingBook;

    fn rate_all(book: &mut RatingBook, user: Uuid, scores: &[(Uuid, u8)]) {
        for &(movie, score) in scores {
            book.rate(user, movie, score);
        }
    }

    #[test]
    fn test_similarity_identical_histories() {
        let mut book = RatingBook::new();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let movies: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();

        rate_all(&mut book, alice, &[(movies[0], 5), (movies[1], 3), (movies[2], 4)]);
        rate_all(&mut book, bob, &[(movies[0], 5), (movies[1], 3), (movies[2], 4)]);

        let predictor = Predictor::new(&book);
        assert!((predictor.similarity(alice, bob) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_similarity_opposite_histories() {
        let mut book = RatingBook::new();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let movies: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();

        rate_all(&mut book, alice, &[(movies[0], 1), (movies[1], 3), (movies[2], 5)]);
        rate_all(&mut book, bob, &[(movies[0], 5), (movies[1], 3), (movies[2], 1)]);

        let predictor = Predictor::new(&book);
        assert!((predictor.similarity(alice, bob) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let mut book = RatingBook::new();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let movies: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();

        rate_all(
            &mut book,
            alice,
            &[(movies[0], 5), (movies[1], 2), (movies[2], 4), (movies[3], 1)],
        );
        rate_all(&mut book, bob, &[(movies[0], 4), (movies[1], 3), (movies[2], 5)]);

        let predictor = Predictor::new(&book);
        let forward = predictor.similarity(alice, bob);
        let backward = predictor.similarity(bob, alice);
        assert!((forward - backward).abs() < 1e-12);
    }

    #[test]
    fn test_similarity_without_overlap_is_zero() {
        let mut book = RatingBook::new();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());

        rate_all(&mut book, alice, &[(Uuid::new_v4(), 5), (Uuid::new_v4(), 2)]);
        rate_all(&mut book, bob, &[(Uuid::new_v4(), 4), (Uuid::new_v4(), 3)]);

        let predictor = Predictor::new(&book);
        assert_eq!(predictor.similarity(alice, bob), 0.0);
    }

    #[test]
    fn test_similarity_zero_variance_is_zero() {
        let mut book = RatingBook::new();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let movies: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();

        // Alice gives everything a 3 regardless of what Bob thinks
        rate_all(&mut book, alice, &[(movies[0], 3), (movies[1], 3), (movies[2], 3)]);
        rate_all(&mut book, bob, &[(movies[0], 1), (movies[1], 4), (movies[2], 5)]);

        let predictor = Predictor::new(&book);
        assert_eq!(predictor.similarity(alice, bob), 0.0);
    }

    #[test]
    fn test_predict_uses_only_positive_similarity_raters() {
        let mut book = RatingBook::new();
        let target = Uuid::new_v4();
        let twin = Uuid::new_v4();
        let contrarian = Uuid::new_v4();
        let (m1, m2) = (Uuid::new_v4(), Uuid::new_v4());
        let unseen = Uuid::new_v4();

        rate_all(&mut book, target, &[(m1, 1), (m2, 5)]);
        // Twin agrees with the target, the contrarian inverts every score
        rate_all(&mut book, twin, &[(m1, 1), (m2, 5), (unseen, 5)]);
        rate_all(&mut book, contrarian, &[(m1, 5), (m2, 1), (unseen, 1)]);

        let predictor = Predictor::new(&book);
        assert!(predictor.similarity(target, twin) > 0.0);
        assert!(predictor.similarity(target, contrarian) < 0.0);

        let predicted = predictor.predict(target, unseen).unwrap();
        assert!((predicted - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_predict_is_a_weighted_average() {
        let mut book = RatingBook::new();
        let target = Uuid::new_v4();
        let close = Uuid::new_v4();
        let further = Uuid::new_v4();
        let movies: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let unseen = Uuid::new_v4();

        rate_all(
            &mut book,
            target,
            &[(movies[0], 1), (movies[1], 2), (movies[2], 4), (movies[3], 5)],
        );
        rate_all(
            &mut book,
            close,
            &[(movies[0], 1), (movies[1], 2), (movies[2], 4), (movies[3], 5), (unseen, 4)],
        );
        rate_all(
            &mut book,
            further,
            &[(movies[0], 2), (movies[1], 1), (movies[2], 4), (movies[3], 5), (unseen, 2)],
        );

        let predictor = Predictor::new(&book);
        let sim_close = predictor.similarity(target, close);
        let sim_further = predictor.similarity(target, further);
        assert!(sim_close > sim_further && sim_further > 0.0);

        let predicted = predictor.predict(target, unseen).unwrap();
        let expected = (sim_close * 4.0 + sim_further * 2.0) / (sim_close + sim_further);
        assert!((predicted - expected).abs() < 1e-9);

        // A weighted average stays within the observed scores
        assert!((2.0..=4.0).contains(&predicted));
    }

    #[test]
    fn test_predict_with_no_raters_is_absent() {
        let mut book = RatingBook::new();
        let target = Uuid::new_v4();
        rate_all(&mut book, target, &[(Uuid::new_v4(), 4)]);

        let predictor = Predictor::new(&book);
        assert_eq!(predictor.predict(target, Uuid::new_v4()), None);
    }

    #[test]
    fn test_predict_with_no_positive_similarity_is_absent() {
        let mut book = RatingBook::new();
        let target = Uuid::new_v4();
        let contrarian = Uuid::new_v4();
        let (m1, m2) = (Uuid::new_v4(), Uuid::new_v4());
        let unseen = Uuid::new_v4();

        rate_all(&mut book, target, &[(m1, 1), (m2, 5)]);
        rate_all(&mut book, contrarian, &[(m1, 5), (m2, 1), (unseen, 3)]);

        let predictor = Predictor::new(&book);
        assert_eq!(predictor.predict(target, unseen), None);
    }

    #[test]
    fn test_predict_ignores_the_users_own_rating() {
        let mut book = RatingBook::new();
        let target = Uuid::new_v4();
        let twin = Uuid::new_v4();
        let (m1, m2) = (Uuid::new_v4(), Uuid::new_v4());
        let movie = Uuid::new_v4();

        rate_all(&mut book, target, &[(m1, 1), (m2, 5), (movie, 1)]);
        rate_all(&mut book, twin, &[(m1, 1), (m2, 5), (movie, 4)]);

        // The target's own score for the movie must not dominate the result
        let predictor = Predictor::new(&book);
        let predicted = predictor.predict(target, movie).unwrap();
        assert!((predicted - 4.0).abs() < 1e-9);
    }
}
