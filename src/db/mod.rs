use anyhow::Result;
use sqlx::{
    Pool, Sqlite,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::{str::FromStr, time::Duration};

pub mod feedback_store;
pub mod user_store;

pub use feedback_store::FeedbackStore;
pub use user_store::UserStore;

pub type DbPool = Pool<Sqlite>;

/// Initialize the database connection pool
pub async fn init_db_pool(database_url: &str) -> Result<DbPool> {
    // Create the database if it doesn't exist; feedback rows rely on the
    // users foreign key being enforced
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    // Create connection pool
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(options)
        .await?;

    // Run migrations
    setup_database(&pool).await?;

    Ok(pool)
}

/// Set up the database schema
async fn setup_database(pool: &DbPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            username TEXT PRIMARY KEY NOT NULL CHECK (length(username) BETWEEN 1 AND 20),
            password TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE CHECK (length(email) <= 50),
            first_name TEXT NOT NULL CHECK (length(first_name) <= 30),
            last_name TEXT NOT NULL CHECK (length(last_name) <= 30),
            session_nonce TEXT NOT NULL DEFAULT (lower(hex(randomblob(16))))
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS feedback (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL CHECK (length(title) <= 100),
            content TEXT NOT NULL,
            username TEXT REFERENCES users(username)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_feedback_username ON feedback(username);")
        .execute(pool)
        .await?;

    tracing::debug!("Database schema ready");
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::path::PathBuf;

    /// Throwaway database file, removed on drop
    pub struct TestDb {
        pub pool: DbPool,
        path: PathBuf,
    }

    impl TestDb {
        pub async fn new() -> Self {
            let path = std::env::temp_dir()
                .join(format!("feedback_test_{}.db", uuid::Uuid::new_v4()));
            let url = format!("sqlite://{}", path.display());
            let pool = init_db_pool(&url).await.expect("Failed to initialize database");
            Self { pool, path }
        }
    }

    impl Drop for TestDb {
        fn drop(&mut self) {
            for suffix in ["", "-wal", "-shm"] {
                let mut file = self.path.clone().into_os_string();
                file.push(suffix);
                let _ = std::fs::remove_file(file);
            }
        }
    }
}
