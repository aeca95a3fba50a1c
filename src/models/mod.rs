mod movie;
mod rating;
mod user;

pub use movie::Movie;
pub use rating::{RatingBook, RatingUpsert, MAX_SCORE, MIN_SCORE};
pub use user::User;
