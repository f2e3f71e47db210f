use serde::Serialize;
use sqlx::FromRow;

/// Database user model
///
/// `password` always holds an Argon2 PHC string, never the plaintext.
/// `session_nonce` is fresh for every account and is carried in its
/// session tokens, so tokens of a deleted account never match a later
/// account with the same username.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub session_nonce: String,
}

/// Public view of a user for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}
