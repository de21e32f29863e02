//! Bulk book import: upload parsing and per-row triage.
//!
//! Rows are triaged in file order:
//! - a row that fails field validation aborts the whole import;
//! - a row whose author does not exist goes to the `not_found` bucket;
//! - a row whose title is already stored, or already accepted earlier in the
//!   same file, goes to the `already_exist` bucket;
//! - every other row is accepted for insertion.

use std::collections::HashSet;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{CreateBook, NewBook},
        import_report::{ImportReport, ImportRow},
    },
};

/// Supported upload formats, chosen by file name suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Json,
    Csv,
}

impl ImportFormat {
    pub fn from_file_name(file_name: &str) -> AppResult<Self> {
        if file_name.ends_with(".json") {
            Ok(ImportFormat::Json)
        } else if file_name.ends_with(".csv") {
            Ok(ImportFormat::Csv)
        } else {
            Err(AppError::BadRequest(
                "Unsupported file format. Please upload a JSON or CSV file.".to_string(),
            ))
        }
    }
}

/// Parse an uploaded file into rows.
pub fn parse_rows(format: ImportFormat, content: &[u8]) -> AppResult<Vec<ImportRow>> {
    match format {
        ImportFormat::Json => parse_json(content),
        ImportFormat::Csv => parse_csv(content),
    }
}

fn parse_json(content: &[u8]) -> AppResult<Vec<ImportRow>> {
    serde_json::from_slice::<Vec<ImportRow>>(content)
        .map_err(|_| AppError::BadRequest("Invalid JSON format".to_string()))
}

/// CSV values stay strings; numeric fields are coerced during validation.
fn parse_csv(content: &[u8]) -> AppResult<Vec<ImportRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(content);

    let headers = reader
        .headers()
        .map_err(|e| AppError::BadRequest(format!("Invalid CSV format: {}", e)))?
        .clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AppError::BadRequest(format!("Invalid CSV format: {}", e)))?;
        let row: ImportRow = headers
            .iter()
            .zip(record.iter())
            .map(|(column, value)| (column.to_string(), Value::String(value.to_string())))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

/// Existence checks the import needs from storage
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImportLookup: Send + Sync {
    async fn author_exists(&self, author_id: i32) -> AppResult<bool>;
    async fn title_exists(&self, title: &str) -> AppResult<bool>;
}

/// Books to insert plus the skip buckets
#[derive(Debug, Default)]
pub struct ImportPlan {
    pub books: Vec<NewBook>,
    pub already_exist: Vec<ImportRow>,
    pub not_found: Vec<ImportRow>,
}

impl ImportPlan {
    /// Build the report once `saved` books have been inserted.
    pub fn into_report(self, saved: usize) -> ImportReport {
        ImportReport {
            saved,
            already_exist: self.already_exist.len(),
            not_found: self.not_found.len(),
            already_exist_books: self.already_exist,
            not_found_authors: self.not_found,
        }
    }
}

fn row_to_book(row: &ImportRow) -> Result<NewBook, String> {
    let value = serde_json::to_value(row).map_err(|e| e.to_string())?;
    let request: CreateBook = serde_json::from_value(value).map_err(|e| e.to_string())?;
    request.validated().map_err(|e| match e {
        AppError::Validation(msg) => msg,
        other => other.to_string(),
    })
}

/// Triage every row. Lookup failures and invalid rows abort with an error.
pub async fn plan_import<L: ImportLookup>(lookup: &L, rows: Vec<ImportRow>) -> AppResult<ImportPlan> {
    let mut plan = ImportPlan::default();
    let mut accepted_titles: HashSet<String> = HashSet::new();

    for (index, row) in rows.into_iter().enumerate() {
        let book = row_to_book(&row).map_err(|reason| {
            AppError::ImportAborted(format!(
                "Something went wrong during book import: row {}: {}",
                index + 1,
                reason
            ))
        })?;

        if !lookup.author_exists(book.author_id).await? {
            tracing::warn!("Import row {}: author {} not found", index + 1, book.author_id);
            plan.not_found.push(row);
            continue;
        }

        if accepted_titles.contains(&book.title) || lookup.title_exists(&book.title).await? {
            tracing::warn!("Import row {}: book '{}' already exists", index + 1, book.title);
            plan.already_exist.push(row);
            continue;
        }

        accepted_titles.insert(book.title.clone());
        plan.books.push(book);
    }

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Utc};
    use mockall::predicate::eq;
    use tokio_test::{assert_err, assert_ok};

    const MIXED_CSV: &str = "title,published_year,genre,author_id\n\
        Dune,1965,Fiction,1\n\
        Existing Title,1990,History,1\n\
        Orphan,2001,Science,99\n";

    #[test]
    fn format_is_chosen_by_suffix() {
        assert_eq!(ImportFormat::from_file_name("books.json").unwrap(), ImportFormat::Json);
        assert_eq!(ImportFormat::from_file_name("books.csv").unwrap(), ImportFormat::Csv);
        assert!(matches!(
            ImportFormat::from_file_name("books.xlsx"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn csv_rows_keep_column_order_and_strings() {
        let rows = parse_rows(ImportFormat::Csv, MIXED_CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        let columns: Vec<&str> = rows[0].keys().map(String::as_str).collect();
        assert_eq!(columns, vec!["title", "published_year", "genre", "author_id"]);
        assert_eq!(rows[2]["author_id"], Value::String("99".to_string()));
    }

    #[test]
    fn ragged_csv_is_a_bad_request() {
        let content = "title,published_year\nDune,1965,extra\n";
        assert!(matches!(
            parse_rows(ImportFormat::Csv, content.as_bytes()),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        let rows = parse_rows(
            ImportFormat::Json,
            br#"[{"title": "Dune", "published_year": 1965, "genre": "Fiction", "author_id": 1}]"#,
        )
        .unwrap();
        assert_eq!(rows[0]["published_year"], Value::from(1965));

        assert!(parse_rows(ImportFormat::Json, br#"{"title": "Dune"}"#).is_err());
        assert!(parse_rows(ImportFormat::Json, b"not json").is_err());
    }

    #[tokio::test]
    async fn mixed_csv_splits_into_saved_existing_and_missing_author() {
        let mut lookup = MockImportLookup::new();
        lookup
            .expect_author_exists()
            .returning(|author_id| Ok(author_id == 1));
        lookup
            .expect_title_exists()
            .returning(|title| Ok(title == "Existing Title"));

        let rows = parse_rows(ImportFormat::Csv, MIXED_CSV.as_bytes()).unwrap();
        let plan = assert_ok!(plan_import(&lookup, rows).await);

        assert_eq!(plan.books.len(), 1);
        assert_eq!(plan.books[0].title, "Dune");

        let report = plan.into_report(1);
        assert_eq!(report.saved, 1);
        assert_eq!(report.already_exist, 1);
        assert_eq!(report.not_found, 1);
        assert_eq!(report.already_exist_books[0]["title"], "Existing Title");
        assert_eq!(report.not_found_authors[0]["title"], "Orphan");
    }

    #[tokio::test]
    async fn author_is_checked_before_title() {
        let mut lookup = MockImportLookup::new();
        lookup
            .expect_author_exists()
            .with(eq(5))
            .times(1)
            .returning(|_| Ok(false));
        lookup.expect_title_exists().never();

        let rows = parse_rows(
            ImportFormat::Json,
            br#"[{"title": "Anything", "published_year": 1999, "genre": "Science", "author_id": 5}]"#,
        )
        .unwrap();
        let plan = plan_import(&lookup, rows).await.unwrap();
        assert_eq!(plan.not_found.len(), 1);
        assert!(plan.already_exist.is_empty());
    }

    #[tokio::test]
    async fn duplicate_title_within_file_is_skipped() {
        let mut lookup = MockImportLookup::new();
        lookup.expect_author_exists().returning(|_| Ok(true));
        lookup.expect_title_exists().times(1).returning(|_| Ok(false));

        let content = "title,published_year,genre,author_id\n\
            Dune,1965,Fiction,1\n\
            Dune,1966,Fiction,1\n";
        let rows = parse_rows(ImportFormat::Csv, content.as_bytes()).unwrap();
        let plan = plan_import(&lookup, rows).await.unwrap();

        assert_eq!(plan.books.len(), 1);
        assert_eq!(plan.already_exist.len(), 1);
        assert_eq!(plan.already_exist[0]["published_year"], "1966");
    }

    #[tokio::test]
    async fn invalid_year_aborts_the_whole_import() {
        let mut lookup = MockImportLookup::new();
        lookup.expect_author_exists().returning(|_| Ok(true));
        lookup.expect_title_exists().returning(|_| Ok(false));

        let content = format!(
            "title,published_year,genre,author_id\nFine,1965,Fiction,1\nFuture,{},Fiction,1\n",
            Utc::now().year() + 1
        );
        let rows = parse_rows(ImportFormat::Csv, content.as_bytes()).unwrap();
        let err = assert_err!(plan_import(&lookup, rows).await);

        match err {
            AppError::ImportAborted(msg) => {
                assert!(msg.contains("row 2"), "{}", msg);
                assert!(msg.contains("Published year"), "{}", msg);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_field_and_bad_genre_abort() {
        let lookup = MockImportLookup::new();

        let rows = parse_rows(
            ImportFormat::Json,
            br#"[{"title": "No Genre", "published_year": 1999, "author_id": 1}]"#,
        )
        .unwrap();
        assert!(matches!(
            plan_import(&lookup, rows).await,
            Err(AppError::ImportAborted(_))
        ));

        let rows = parse_rows(
            ImportFormat::Json,
            br#"[{"title": "Verses", "published_year": 1999, "genre": "Poetry", "author_id": 1}]"#,
        )
        .unwrap();
        assert!(matches!(
            plan_import(&lookup, rows).await,
            Err(AppError::ImportAborted(_))
        ));
    }

    #[tokio::test]
    async fn lookup_failure_propagates() {
        let mut lookup = MockImportLookup::new();
        lookup
            .expect_author_exists()
            .returning(|_| Err(AppError::Database(sqlx::Error::PoolTimedOut)));

        let rows = parse_rows(ImportFormat::Csv, MIXED_CSV.as_bytes()).unwrap();
        assert!(matches!(
            plan_import(&lookup, rows).await,
            Err(AppError::Database(_))
        ));
    }
}
