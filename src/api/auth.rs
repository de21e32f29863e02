//! Authentication endpoints

use axum::{extract::State, http::StatusCode, Form, Json};

use crate::{
    error::{AppError, AppResult, ErrorResponse},
    models::user::{RegisterUser, TokenRequest, TokenResponse, User},
    AppState,
};

use super::ApiResponse;

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterUser,
    responses(
        (status = 201, description = "User registered; `data` holds the user", body = User),
        (status = 400, description = "Username already registered", body = ErrorResponse),
        (status = 422, description = "Invalid username or password", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterUser>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    let user = state.services.auth.register(request).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_data("User registered successfully", user),
    ))
}

/// Log in with the OAuth2 password flow and obtain a bearer token
#[utoipa::path(
    post,
    path = "/auth/token",
    tag = "auth",
    request_body(content = TokenRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Access token", body = TokenResponse),
        (status = 400, description = "Unsupported grant type", body = ErrorResponse),
        (status = 401, description = "Incorrect username or password", body = ErrorResponse)
    )
)]
pub async fn token(
    State(state): State<AppState>,
    Form(form): Form<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    if let Some(ref grant_type) = form.grant_type {
        if grant_type != "password" {
            return Err(AppError::BadRequest(format!("Unsupported grant type: {}", grant_type)));
        }
    }

    let token = state.services.auth.login(&form.username, &form.password).await?;
    Ok(Json(token))
}
