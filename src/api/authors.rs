//! Author endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppResult, ErrorResponse},
    models::author::{Author, AuthorList, CreateAuthor, UpdateAuthorParams},
    AppState,
};

use super::{ApiResponse, AuthenticatedUser};

/// Create a new author
#[utoipa::path(
    post,
    path = "/authors/create",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created; `data` holds the author", body = Author),
        (status = 400, description = "Author already exists", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 422, description = "Invalid birth date or name", body = ErrorResponse)
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(request): Json<CreateAuthor>,
) -> AppResult<(StatusCode, Json<ApiResponse<Author>>)> {
    let author = state.services.authors.create(request).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_data("Author created successfully", author),
    ))
}

/// List all authors
#[utoipa::path(
    get,
    path = "/authors/all",
    tag = "authors",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "`data.authors` holds every author", body = AuthorList),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<AuthorList>>> {
    let authors = state.services.authors.list().await?;
    Ok(ApiResponse::with_data(
        "Authors fetched successfully",
        AuthorList { authors },
    ))
}

/// Get author by ID
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = Author),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Author>>> {
    let author = state.services.authors.get_by_id(id).await?;
    Ok(ApiResponse::with_data("Author fetched successfully", author))
}

/// Update an author; only supplied query parameters change
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID"), UpdateAuthorParams),
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 404, description = "Author not found", body = ErrorResponse),
        (status = 422, description = "Invalid birth date", body = ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Query(params): Query<UpdateAuthorParams>,
) -> AppResult<Json<ApiResponse<Author>>> {
    let author = state.services.authors.update(id, params).await?;
    Ok(ApiResponse::with_data("Author updated successfully", author))
}

/// Delete an author
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author deleted"),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.services.authors.delete(id).await?;
    Ok(ApiResponse::message("Author deleted successfully"))
}
