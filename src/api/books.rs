//! Book endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::Multipart;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult, ErrorResponse},
    models::{
        book::{Book, BookList, BookQuery, BookWithAuthor, CreateBook, UpdateBookParams},
        import_report::ImportReport,
    },
    AppState,
};

use super::{ApiResponse, AuthenticatedUser};

/// Multipart form accepted by the import endpoint
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ImportUpload {
    /// A `.json` array of book objects or a `.csv` file with a header row
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books/create",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created; `data` embeds the author", body = BookWithAuthor),
        (status = 400, description = "Book already exists", body = ErrorResponse),
        (status = 404, description = "Author not found", body = ErrorResponse),
        (status = 422, description = "Invalid year or genre", body = ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(request): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<ApiResponse<BookWithAuthor>>)> {
    let book = state.services.catalog.create_book(request).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_data("Book created successfully", book),
    ))
}

/// Bulk import books from a JSON or CSV upload
#[utoipa::path(
    post,
    path = "/books/import",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body(content = ImportUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Import finished; skipped rows are listed", body = ImportReport),
        (status = 400, description = "Missing file, unsupported format or unreadable content", body = ErrorResponse),
        (status = 500, description = "A row failed validation; nothing was imported", body = ErrorResponse)
    )
)]
pub async fn import_books(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<ImportReport>>> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read uploaded file: {}", e)))?;
        upload = Some((file_name, content));
        break;
    }

    let (file_name, content) =
        upload.ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;

    tracing::info!("User {} importing books from {}", claims.sub, file_name);
    let report = state
        .services
        .catalog
        .import_books(&file_name, &content)
        .await?;

    Ok(ApiResponse::with_data(
        format!("{} books created successfully", report.saved),
        report,
    ))
}

/// List all books
#[utoipa::path(
    get,
    path = "/books/all",
    tag = "books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "`data.books` holds every book", body = BookList),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<BookList>>> {
    let books = state.services.catalog.list_books().await?;
    Ok(ApiResponse::with_data(
        "Books fetched successfully",
        BookList { books },
    ))
}

/// Get book by ID, with its author
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookWithAuthor),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<BookWithAuthor>>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(ApiResponse::with_data("Book fetched successfully", book))
}

/// Search books by title, author, genre and year
#[utoipa::path(
    get,
    path = "/books/search/",
    tag = "books",
    security(("bearer_auth" = [])),
    params(BookQuery),
    responses(
        (status = 200, description = "`data.books` holds the matches", body = BookList),
        (status = 404, description = "No books found", body = ErrorResponse)
    )
)]
pub async fn search_books(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<ApiResponse<BookList>>> {
    let books = state.services.catalog.search_books(query).await?;
    Ok(ApiResponse::with_data(
        "Books fetched successfully",
        BookList { books },
    ))
}

/// Update a book; only supplied query parameters change
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID"), UpdateBookParams),
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Title used by another book", body = ErrorResponse),
        (status = 404, description = "Book or author not found", body = ErrorResponse),
        (status = 422, description = "Invalid year or genre", body = ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Query(params): Query<UpdateBookParams>,
) -> AppResult<Json<ApiResponse<Book>>> {
    let book = state.services.catalog.update_book(id, params).await?;
    Ok(ApiResponse::with_data("Book updated successfully", book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted"),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.services.catalog.delete_book(id).await?;
    Ok(ApiResponse::message("Book deleted successfully"))
}
