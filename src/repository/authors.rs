//! Author domain methods on Repository

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::author::{Author, AuthorChanges, NewAuthor},
};

impl Repository {
    /// List all authors
    pub async fn authors_list(&self) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>("SELECT * FROM authors ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get author by ID
    pub async fn authors_get_by_id(&self, id: i32) -> AppResult<Author> {
        self.authors_find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Author not found".to_string()))
    }

    pub async fn authors_find_by_id(&self, id: i32) -> AppResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(author)
    }

    /// Check if an author with this ID exists
    pub async fn authors_exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authors WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Check if an author with exactly this name and surname exists
    pub async fn authors_name_exists(&self, name: &str, surname: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authors WHERE name = $1 AND surname = $2)")
                .bind(name)
                .bind(surname)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Create an author
    pub async fn authors_create(&self, data: &NewAuthor) -> AppResult<Author> {
        let row = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (name, surname, birth_date, biography)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.surname)
        .bind(data.birth_date)
        .bind(&data.biography)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update only the columns present in `data`
    pub async fn authors_update(&self, id: i32, data: &AuthorChanges) -> AppResult<Author> {
        if data.is_empty() {
            return self.authors_get_by_id(id).await;
        }

        let mut sets = Vec::new();
        let mut idx = 1;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.name, "name");
        add_field!(data.surname, "surname");
        add_field!(data.birth_date, "birth_date");
        add_field!(data.biography, "biography");

        let query = format!(
            "UPDATE authors SET {} WHERE id = ${} RETURNING *",
            sets.join(", "),
            idx
        );

        let mut builder = sqlx::query_as::<_, Author>(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.name);
        bind_field!(data.surname);
        bind_field!(data.birth_date);
        bind_field!(data.biography);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Author not found".to_string()))
    }

    /// Delete an author
    pub async fn authors_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Author not found".to_string()));
        }
        Ok(())
    }
}
