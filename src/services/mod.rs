pub mod correlation;
pub mod predictor;

pub use predictor::{Predictor, RatingSource};
