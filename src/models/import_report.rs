//! Bulk import report

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

/// One uploaded record, column name to value, in file order
pub type ImportRow = IndexMap<String, Value>;

/// Outcome of a bulk import
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct ImportReport {
    /// Number of books inserted
    pub saved: usize,
    /// Number of rows skipped because the title already exists
    pub already_exist: usize,
    /// Number of rows skipped because the author does not exist
    pub not_found: usize,
    /// Rows skipped because the title already exists, as uploaded
    #[schema(value_type = Vec<Object>)]
    pub already_exist_books: Vec<ImportRow>,
    /// Rows skipped because the author does not exist, as uploaded
    #[schema(value_type = Vec<Object>)]
    pub not_found_authors: Vec<ImportRow>,
}
