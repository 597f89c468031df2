use serde::{Deserialize, Serialize};

use crate::domain::user::User;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

/// Optional exact-email filter for the search endpoint. An absent or empty
/// filter lists every user.
#[derive(Debug, Default, Deserialize)]
pub struct SearchUsersQuery {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// Serialized as a string: storage ids can exceed the integer range JSON
    /// consumers handle safely.
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            email: value.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchUsersResponse {
    pub users: Vec<UserResponse>,
}

impl SearchUsersResponse {
    pub fn from_users(users: Vec<User>) -> Self {
        Self {
            users: users.into_iter().map(UserResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
