use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user of the ratings site
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,
    /// Email address used to log in
    pub email: String,
    /// Login password (never serialized into API responses)
    pub password: String,
    /// Self-reported age
    pub age: Option<u8>,
    /// Self-reported zipcode
    pub zipcode: Option<String>,
}

impl User {
    /// Creates a new user with a fresh identifier
    pub fn new(email: String, password: String, age: Option<u8>, zipcode: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            password,
            age,
            zipcode,
        }
    }
}
