//! User domain methods on Repository

use super::Repository;
use crate::{error::AppResult, models::user::User};

impl Repository {
    /// Get user by username
    pub async fn users_get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Check if username already exists
    pub async fn users_username_exists(&self, username: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Create a new user
    pub async fn users_create(&self, username: &str, hashed_password: &str) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, hashed_password)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }
}
