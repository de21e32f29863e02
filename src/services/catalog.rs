//! Book catalog service, including bulk import

use async_trait::async_trait;

use crate::{
    error::{AppError, AppResult},
    import::{self, ImportFormat, ImportLookup},
    models::{
        book::{Book, BookQuery, BookWithAuthor, CreateBook, UpdateBookParams},
        import_report::ImportReport,
    },
    repository::Repository,
};

#[async_trait]
impl ImportLookup for Repository {
    async fn author_exists(&self, author_id: i32) -> AppResult<bool> {
        self.authors_exists(author_id).await
    }

    async fn title_exists(&self, title: &str) -> AppResult<bool> {
        self.books_title_exists(title, None).await
    }
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a book for an existing author with a title not yet in use
    pub async fn create_book(&self, request: CreateBook) -> AppResult<BookWithAuthor> {
        let book = request.validated()?;

        let author = self
            .repository
            .authors_find_by_id(book.author_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Author not found".to_string()))?;

        if self.repository.books_title_exists(&book.title, None).await? {
            return Err(AppError::AlreadyExists("Book already exists".to_string()));
        }

        let created = self
            .repository
            .books_create(&book)
            .await
            .map_err(|e| super::unique_violation_as(e, "Book already exists"))?;

        tracing::info!("Created book {} ({})", created.id, created.title);
        Ok(BookWithAuthor::new(created, author))
    }

    /// Import books from an uploaded JSON or CSV file.
    ///
    /// Rows with a missing author or an existing title are reported and skipped;
    /// any other invalid row aborts the import before anything is written.
    pub async fn import_books(&self, file_name: &str, content: &[u8]) -> AppResult<ImportReport> {
        let format = ImportFormat::from_file_name(file_name)?;
        let rows = import::parse_rows(format, content)?;
        tracing::info!("Importing {} rows from {}", rows.len(), file_name);

        let plan = import::plan_import(&self.repository, rows).await?;
        let saved = self
            .repository
            .books_bulk_create(&plan.books)
            .await
            .map_err(|e| super::unique_violation_as(e, "Book already exists"))?;

        let report = plan.into_report(saved as usize);
        tracing::info!(
            "Import of {} finished: {} saved, {} already exist, {} missing author",
            file_name,
            report.saved,
            report.already_exist,
            report.not_found
        );
        Ok(report)
    }

    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books_list().await
    }

    /// Get a book with its author embedded
    pub async fn get_book(&self, id: i32) -> AppResult<BookWithAuthor> {
        let book = self.repository.books_get_by_id(id).await?;
        let author = self.repository.authors_get_by_id(book.author_id).await?;
        Ok(BookWithAuthor::new(book, author))
    }

    /// Filtered search; an empty result is reported as not found
    pub async fn search_books(&self, query: BookQuery) -> AppResult<Vec<Book>> {
        let filter = query.into_filter()?;
        let books = self.repository.books_search(&filter).await?;
        if books.is_empty() {
            return Err(AppError::NotFound("No books found".to_string()));
        }
        Ok(books)
    }

    /// Apply the supplied fields; everything else is kept
    pub async fn update_book(&self, id: i32, params: UpdateBookParams) -> AppResult<Book> {
        let changes = params.into_changes()?;
        let existing = self.repository.books_get_by_id(id).await?;

        if changes.is_empty() {
            return Ok(existing);
        }

        if let Some(author_id) = changes.author_id {
            if !self.repository.authors_exists(author_id).await? {
                return Err(AppError::NotFound("Author not found".to_string()));
            }
        }

        if let Some(ref title) = changes.title {
            if self.repository.books_title_exists(title, Some(id)).await? {
                return Err(AppError::AlreadyExists("Book already exists".to_string()));
            }
        }

        self.repository
            .books_update(id, &changes)
            .await
            .map_err(|e| super::unique_violation_as(e, "Book already exists"))
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books_delete(id).await?;
        tracing::info!("Deleted book {}", id);
        Ok(())
    }
}
