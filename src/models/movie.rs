use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A movie users can rate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    /// Unique identifier for the movie
    pub id: Uuid,
    /// Title of the movie
    pub title: String,
    /// Theatrical release date, if known
    pub released_at: Option<DateTime<Utc>>,
    /// Link to the movie's IMDb page
    pub imdb_url: Option<String>,
}

impl Movie {
    /// Creates a new movie with a fresh identifier
    pub fn new(title: String, released_at: Option<DateTime<Utc>>, imdb_url: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            released_at,
            imdb_url,
        }
    }
}
