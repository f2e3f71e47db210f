use crate::{
    db::DbPool,
    error::{AppError, Result},
    forms::FeedbackInput,
    models::Feedback,
};

/// Feedback store for database operations
#[derive(Clone)]
pub struct FeedbackStore {
    pool: DbPool,
}

impl FeedbackStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create feedback owned by an existing user
    pub async fn create(&self, input: FeedbackInput, owner: &str) -> Result<Feedback> {
        let feedback = sqlx::query_as::<_, Feedback>(
            r#"
            INSERT INTO feedback (title, content, username)
            VALUES (?, ?, ?)
            RETURNING id, title, content, username
            "#,
        )
        .bind(&input.title)
        .bind(&input.content)
        .bind(owner)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from_feedback_insert)?;

        tracing::info!("User {} added feedback {}", owner, feedback.id);
        Ok(feedback)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Feedback> {
        sqlx::query_as::<_, Feedback>("SELECT * FROM feedback WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::FeedbackNotFound)
    }

    /// Feedback owned by `username`, oldest first
    pub async fn list_by_owner(&self, username: &str) -> Result<Vec<Feedback>> {
        let feedback =
            sqlx::query_as::<_, Feedback>("SELECT * FROM feedback WHERE username = ? ORDER BY id")
                .bind(username)
                .fetch_all(&self.pool)
                .await?;

        Ok(feedback)
    }

    pub async fn list_all(&self) -> Result<Vec<Feedback>> {
        let feedback = sqlx::query_as::<_, Feedback>("SELECT * FROM feedback ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(feedback)
    }

    /// Replace title and content. Id and owner never change.
    pub async fn update(&self, id: i64, input: FeedbackInput) -> Result<Feedback> {
        sqlx::query_as::<_, Feedback>(
            r#"
            UPDATE feedback
            SET title = ?, content = ?
            WHERE id = ?
            RETURNING id, title, content, username
            "#,
        )
        .bind(&input.title)
        .bind(&input.content)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::FeedbackNotFound)
    }

    pub async fn delete_by_id(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM feedback WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Remove every feedback row owned by `username`
    pub async fn delete_by_owner(&self, username: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM feedback WHERE username = ?")
            .bind(username)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{UserStore, testing::TestDb},
        forms::NewUser,
        services::password_service::test_service,
    };

    fn input(title: &str, content: &str) -> FeedbackInput {
        FeedbackInput {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    async fn setup() -> (TestDb, FeedbackStore) {
        let db = TestDb::new().await;
        let users = UserStore::new(db.pool.clone(), test_service());
        for (username, email) in [("alice", "a@x.com"), ("bobby", "b@x.com")] {
            users
                .register(NewUser {
                    username: username.to_string(),
                    password: "pw123".to_string(),
                    email: email.to_string(),
                    first_name: "F".to_string(),
                    last_name: "L".to_string(),
                })
                .await
                .unwrap();
        }
        let store = FeedbackStore::new(db.pool.clone());
        (db, store)
    }

    #[tokio::test]
    async fn test_create_assigns_ids() {
        let (_db, store) = setup().await;
        let first = store.create(input("Hi", "body"), "alice").await.unwrap();
        let second = store.create(input("Again", "more"), "alice").await.unwrap();

        assert_eq!(
            first,
            Feedback {
                id: 1,
                title: "Hi".to_string(),
                content: "body".to_string(),
                username: Some("alice".to_string()),
            }
        );
        assert!(second.id > first.id);
        assert_eq!(store.find_by_id(first.id).await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_create_requires_existing_owner() {
        let (_db, store) = setup().await;
        let err = store.create(input("Hi", "body"), "ghost").await.unwrap_err();
        assert!(matches!(err, AppError::UserNotFound));
    }

    #[tokio::test]
    async fn test_find_missing() {
        let (_db, store) = setup().await;
        assert!(matches!(
            store.find_by_id(42).await,
            Err(AppError::FeedbackNotFound)
        ));
    }

    #[tokio::test]
    async fn test_list_by_owner_and_all() {
        let (_db, store) = setup().await;
        store.create(input("a1", "x"), "alice").await.unwrap();
        store.create(input("b1", "x"), "bobby").await.unwrap();
        store.create(input("a2", "x"), "alice").await.unwrap();

        let titles = |items: Vec<Feedback>| items.into_iter().map(|f| f.title).collect::<Vec<_>>();
        assert_eq!(titles(store.list_by_owner("alice").await.unwrap()), ["a1", "a2"]);
        assert_eq!(titles(store.list_by_owner("bobby").await.unwrap()), ["b1"]);
        assert_eq!(titles(store.list_all().await.unwrap()), ["a1", "b1", "a2"]);
    }

    #[tokio::test]
    async fn test_update_changes_only_title_and_content() {
        let (_db, store) = setup().await;
        let created = store.create(input("Hi", "body"), "alice").await.unwrap();

        let updated = store.update(created.id, input("Hi2", "body2")).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.username, created.username);
        assert_eq!(updated.title, "Hi2");
        assert_eq!(updated.content, "body2");
        assert_eq!(store.find_by_id(created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_missing() {
        let (_db, store) = setup().await;
        assert!(matches!(
            store.update(7, input("t", "c")).await,
            Err(AppError::FeedbackNotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_by_id() {
        let (_db, store) = setup().await;
        let keep = store.create(input("keep", "x"), "alice").await.unwrap();
        let gone = store.create(input("gone", "x"), "alice").await.unwrap();

        store.delete_by_id(gone.id).await.unwrap();
        assert!(store.find_by_id(gone.id).await.is_err());
        assert!(store.find_by_id(keep.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_by_owner() {
        let (_db, store) = setup().await;
        store.create(input("a1", "x"), "alice").await.unwrap();
        store.create(input("a2", "x"), "alice").await.unwrap();
        let other = store.create(input("b1", "x"), "bobby").await.unwrap();

        assert_eq!(store.delete_by_owner("alice").await.unwrap(), 2);
        assert!(store.list_by_owner("alice").await.unwrap().is_empty());
        assert_eq!(store.list_all().await.unwrap(), vec![other]);
    }
}
