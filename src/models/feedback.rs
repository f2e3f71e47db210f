use serde::Serialize;
use sqlx::FromRow;

/// Database feedback model
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Feedback {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// Owning username. Only `None` for rows orphaned outside this app.
    pub username: Option<String>,
}
