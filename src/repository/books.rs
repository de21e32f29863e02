//! Book domain methods on Repository

use sqlx::{Postgres, QueryBuilder};

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookChanges, BookFilter, NewBook},
};

/// Rows per INSERT statement; keeps each statement far below the bind-parameter limit
const BULK_INSERT_CHUNK: usize = 1000;

/// Escape LIKE wildcards so user input matches literally
fn like_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

impl Repository {
    /// List all books
    pub async fn books_list(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get book by ID
    pub async fn books_get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    /// Check if a title is already used, optionally ignoring one book
    pub async fn books_title_exists(&self, title: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE title = $1 AND id != $2)")
                .bind(title)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE title = $1)")
                .bind(title)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    /// Create a book
    pub async fn books_create(&self, data: &NewBook) -> AppResult<Book> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, published_year, genre, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(data.published_year)
        .bind(data.genre)
        .bind(data.author_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Insert many books in one transaction. Either all rows land or none do.
    pub async fn books_bulk_create(&self, books: &[NewBook]) -> AppResult<u64> {
        if books.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for chunk in books.chunks(BULK_INSERT_CHUNK) {
            let mut builder: QueryBuilder<Postgres> =
                QueryBuilder::new("INSERT INTO books (title, published_year, genre, author_id) ");
            builder.push_values(chunk, |mut row, book| {
                row.push_bind(&book.title)
                    .push_bind(book.published_year)
                    .push_bind(book.genre)
                    .push_bind(book.author_id);
            });
            inserted += builder.build().execute(&mut *tx).await?.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// Search books; every supplied filter must match
    pub async fn books_search(&self, filter: &BookFilter) -> AppResult<Vec<Book>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM books WHERE TRUE");

        if let Some(ref title) = filter.title {
            builder.push(" AND title ILIKE ").push_bind(like_pattern(title));
        }
        if let Some(author_id) = filter.author_id {
            builder.push(" AND author_id = ").push_bind(author_id);
        }
        if let Some(ref genre) = filter.genre {
            builder.push(" AND genre ILIKE ").push_bind(like_pattern(genre));
        }
        if let Some(year) = filter.year {
            builder.push(" AND published_year = ").push_bind(year);
        }
        builder.push(" ORDER BY id");

        let rows = builder
            .build_query_as::<Book>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Update only the columns present in `data`
    pub async fn books_update(&self, id: i32, data: &BookChanges) -> AppResult<Book> {
        if data.is_empty() {
            return self.books_get_by_id(id).await;
        }

        let sets: Vec<String> = data
            .changed_columns()
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{} = ${}", column, i + 1))
            .collect();

        let query = format!(
            "UPDATE books SET {} WHERE id = ${} RETURNING *",
            sets.join(", "),
            sets.len() + 1
        );

        let mut builder = sqlx::query_as::<_, Book>(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        // Same order as BookChanges::changed_columns
        bind_field!(data.title);
        bind_field!(data.published_year);
        bind_field!(data.genre);
        bind_field!(data.author_id);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    /// Delete a book
    pub async fn books_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Book not found".to_string()));
        }
        Ok(())
    }
}
