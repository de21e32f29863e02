//! Data models for the catalog

pub mod author;
pub mod book;
pub mod import_report;
pub mod user;

use validator::ValidationErrors;

use crate::error::AppError;

// Re-export commonly used types
pub use author::Author;
pub use book::{Book, BookWithAuthor, Genre};
pub use import_report::ImportReport;
pub use user::{Claims, User};

/// Flatten `validator` errors into a single client-facing message.
pub(crate) fn validation_error(errors: ValidationErrors) -> AppError {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("Invalid value for {}", field),
            })
        })
        .collect();
    messages.sort();
    AppError::Validation(messages.join("; "))
}
