//! Author management service

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, CreateAuthor, UpdateAuthorParams},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create an author unless one with the same name and surname exists
    pub async fn create(&self, request: CreateAuthor) -> AppResult<Author> {
        let author = request.validated()?;

        if self
            .repository
            .authors_name_exists(&author.name, &author.surname)
            .await?
        {
            return Err(AppError::AlreadyExists("Author already exists".to_string()));
        }

        let created = self
            .repository
            .authors_create(&author)
            .await
            .map_err(|e| super::unique_violation_as(e, "Author already exists"))?;
        tracing::info!("Created author {} ({})", created.id, created.full_name);
        Ok(created)
    }

    pub async fn list(&self) -> AppResult<Vec<Author>> {
        self.repository.authors_list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        self.repository.authors_get_by_id(id).await
    }

    /// Apply the supplied fields; everything else is kept
    pub async fn update(&self, id: i32, params: UpdateAuthorParams) -> AppResult<Author> {
        let existing = self.repository.authors_get_by_id(id).await?;
        let changes = params.resolve(&existing)?;

        if changes.is_empty() {
            return Ok(existing);
        }
        self.repository
            .authors_update(id, &changes)
            .await
            .map_err(|e| super::unique_violation_as(e, "Author already exists"))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.authors_delete(id).await?;
        tracing::info!("Deleted author {}", id);
        Ok(())
    }
}
