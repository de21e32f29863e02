//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, authors, books, health};

/// Registers the JWT bearer scheme referenced by protected routes
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "1.0.0",
        description = "Library catalog REST API: authors, books and bulk import"
    ),
    servers(
        (url = "/v1/api", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::token,
        // Authors
        authors::create_author,
        authors::list_authors,
        authors::get_author,
        authors::update_author,
        authors::delete_author,
        // Books
        books::create_book,
        books::import_books,
        books::list_books,
        books::search_books,
        books::get_book,
        books::update_book,
        books::delete_book,
    ),
    components(
        schemas(
            // Auth
            crate::models::user::User,
            crate::models::user::RegisterUser,
            crate::models::user::TokenRequest,
            crate::models::user::TokenResponse,
            // Authors
            crate::models::author::Author,
            crate::models::author::AuthorList,
            crate::models::author::CreateAuthor,
            // Books
            crate::models::book::Book,
            crate::models::book::BookWithAuthor,
            crate::models::book::BookList,
            crate::models::book::CreateBook,
            crate::models::book::Genre,
            crate::models::import_report::ImportReport,
            books::ImportUpload,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration and token endpoints"),
        (name = "authors", description = "Author management"),
        (name = "books", description = "Book management and bulk import")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
