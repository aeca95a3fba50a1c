use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Movie, RatingBook, User};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<RwLock<AppStateInner>>,
}

/// Inner state that can be modified
pub struct AppStateInner {
    pub users: HashMap<Uuid, User>,
    pub movies: HashMap<Uuid, Movie>,
    pub ratings: RatingBook,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Creates a new empty application state
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(AppStateInner {
                users: HashMap::new(),
                movies: HashMap::new(),
                ratings: RatingBook::new(),
            })),
        }
    }
}
