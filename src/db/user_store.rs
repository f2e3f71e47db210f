use uuid::Uuid;

use crate::{
    db::DbPool,
    error::{AppError, Result},
    forms::NewUser,
    models::User,
    services::PasswordService,
};

/// User store for database operations
#[derive(Clone)]
pub struct UserStore {
    pool: DbPool,
    passwords: PasswordService,
}

impl UserStore {
    /// Create a new UserStore with the provided database pool
    pub fn new(pool: DbPool, passwords: PasswordService) -> Self {
        Self { pool, passwords }
    }

    /// Get a user by username
    pub async fn find_by_username(&self, username: &str) -> Result<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    /// Get a user by email address
    pub async fn find_by_email(&self, email: &str) -> Result<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    /// Create a new user with a hashed password
    pub async fn register(&self, new_user: NewUser) -> Result<User> {
        // Pre-check for a clean message; the table constraints still decide
        if found(self.find_by_username(&new_user.username).await)? {
            return Err(AppError::DuplicateUsername);
        }
        if found(self.find_by_email(&new_user.email).await)? {
            return Err(AppError::DuplicateEmail);
        }

        let passwords = self.passwords.clone();
        let plaintext = new_user.password;
        let hash = tokio::task::spawn_blocking(move || passwords.hash(&plaintext)).await??;

        let user = User {
            username: new_user.username,
            password: hash,
            email: new_user.email,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            session_nonce: Uuid::new_v4().simple().to_string(),
        };

        sqlx::query(
            r#"
            INSERT INTO users (username, password, email, first_name, last_name, session_nonce)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.username)
        .bind(&user.password)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.session_nonce)
        .execute(&self.pool)
        .await
        .map_err(AppError::from_user_insert)?;

        tracing::info!("Registered user {}", user.username);
        Ok(user)
    }

    /// Check a username/password pair.
    ///
    /// Unknown usernames and wrong passwords fail identically.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let user = match self.find_by_username(username).await {
            Ok(user) => Some(user),
            Err(AppError::UserNotFound) => None,
            Err(e) => return Err(e),
        };

        let passwords = self.passwords.clone();
        let plaintext = password.to_string();
        let stored = user.as_ref().map(|user| user.password.clone());
        let verified = tokio::task::spawn_blocking(move || match stored {
            Some(hash) => passwords.verify(&hash, &plaintext),
            None => {
                passwords.verify_dummy(&plaintext);
                false
            }
        })
        .await?;

        match user {
            Some(user) if verified => Ok(user),
            _ => {
                tracing::warn!("Failed login attempt for {}", username);
                Err(AppError::InvalidCredentials)
            }
        }
    }

    /// Delete a user by username.
    ///
    /// Feedback owned by the user must be removed first.
    pub async fn delete_by_username(&self, username: &str) -> Result<()> {
        sqlx::query("DELETE FROM users WHERE username = ?")
            .bind(username)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete a user and all feedback it owns in one transaction.
    ///
    /// Returns the number of feedback entries removed. Nothing is removed
    /// if either delete fails.
    pub async fn delete_with_feedback(&self, username: &str) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        // Feedback first, the foreign key rejects the user delete otherwise
        let removed = sqlx::query("DELETE FROM feedback WHERE username = ?")
            .bind(username)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM users WHERE username = ?")
            .bind(username)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(removed)
    }

    /// Nonce of the account currently holding `username`
    pub async fn session_nonce(&self, username: &str) -> Result<Option<String>> {
        let nonce = sqlx::query_scalar::<_, String>(
            "SELECT session_nonce FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(nonce)
    }
}

fn found(lookup: Result<User>) -> Result<bool> {
    match lookup {
        Ok(_) => Ok(true),
        Err(AppError::UserNotFound) => Ok(false),
        Err(e) => Err(e),
    }
}
