use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    db::{DbPool, FeedbackStore, UserStore},
    services::{PasswordService, SessionService},
};

pub mod auth;
pub mod feedback;
pub mod user;

/// Shared state handed to every handler
#[derive(Clone, FromRef)]
pub struct AppState {
    pub users: UserStore,
    pub feedback: FeedbackStore,
    pub sessions: Arc<SessionService>,
}

impl AppState {
    pub fn new(pool: DbPool, passwords: PasswordService, sessions: SessionService) -> Self {
        Self {
            users: UserStore::new(pool.clone(), passwords),
            feedback: FeedbackStore::new(pool),
            sessions: Arc::new(sessions),
        }
    }
}

/// Location of a user's page
pub(crate) fn user_path(username: &str) -> String {
    format!("/users/{}", username)
}
