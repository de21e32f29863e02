//! Book model and related types

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::author::Author;
use crate::error::{AppError, AppResult};

/// Earliest accepted publication year
pub const MIN_PUBLISHED_YEAR: i32 = 1800;

/// Book genre whitelist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Genre {
    Fiction,
    #[serde(rename = "Non-Fiction")]
    NonFiction,
    Science,
    History,
}

impl Genre {
    pub const ALL: [Genre; 4] = [Genre::Fiction, Genre::NonFiction, Genre::Science, Genre::History];

    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Fiction => "Fiction",
            Genre::NonFiction => "Non-Fiction",
            Genre::Science => "Science",
            Genre::History => "History",
        }
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Genre {
    type Err = AppError;

    /// Matching is exact: "fiction" is not a genre.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Genre::ALL
            .into_iter()
            .find(|genre| genre.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Genre::ALL.iter().map(Genre::as_str).collect();
                AppError::Validation(format!(
                    "Genre must be one of those genres: {}.",
                    names.join(", ")
                ))
            })
    }
}

// SQLx conversion for Genre (stored as text)
impl sqlx::Type<Postgres> for Genre {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for Genre {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: AppError| e.to_string().into())
    }
}

impl Encode<'_, Postgres> for Genre {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Check a publication year against [1800, current year].
pub fn validate_published_year(year: i32) -> AppResult<()> {
    let current_year = Utc::now().year();
    if (MIN_PUBLISHED_YEAR..=current_year).contains(&year) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Published year must be between {} and {}.",
            MIN_PUBLISHED_YEAR, current_year
        )))
    }
}

/// Book as stored
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub published_year: i32,
    pub genre: Genre,
    pub author_id: i32,
    pub created_at: DateTime<Utc>,
}

/// Book with its author embedded, returned by create and get-by-id
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookWithAuthor {
    pub id: i32,
    pub title: String,
    pub published_year: i32,
    pub genre: Genre,
    pub author: Author,
}

impl BookWithAuthor {
    pub fn new(book: Book, author: Author) -> Self {
        Self {
            id: book.id,
            title: book.title,
            published_year: book.published_year,
            genre: book.genre,
            author,
        }
    }
}

/// Wrapper for book listings
#[derive(Debug, Serialize, ToSchema)]
pub struct BookList {
    pub books: Vec<Book>,
}

/// Create book request.
///
/// Numeric fields also accept numeric strings, which is what CSV imports produce.
#[serde_as]
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters."))]
    pub title: String,
    /// Must be between 1800 and the current year
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[schema(value_type = i32)]
    pub published_year: i32,
    /// One of: Fiction, Non-Fiction, Science, History
    pub genre: String,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[schema(value_type = i32)]
    pub author_id: i32,
}

/// A create request that passed every field rule
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub published_year: i32,
    pub genre: Genre,
    pub author_id: i32,
}

impl CreateBook {
    pub fn validated(self) -> AppResult<NewBook> {
        self.validate().map_err(super::validation_error)?;
        validate_published_year(self.published_year)?;
        let genre = self.genre.parse::<Genre>()?;

        Ok(NewBook {
            title: self.title,
            published_year: self.published_year,
            genre,
            author_id: self.author_id,
        })
    }
}

/// Update book query parameters; absent fields are left untouched
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UpdateBookParams {
    /// New title
    pub book_title: Option<String>,
    /// New genre
    pub book_genre: Option<String>,
    /// New publication year
    pub book_published_year: Option<i32>,
    /// New author ID
    pub book_author_id: Option<i32>,
}

/// Validated set of book field changes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookChanges {
    pub title: Option<String>,
    pub published_year: Option<i32>,
    pub genre: Option<Genre>,
    pub author_id: Option<i32>,
}

impl UpdateBookParams {
    pub fn into_changes(self) -> AppResult<BookChanges> {
        if let Some(ref title) = self.book_title {
            if title.is_empty() || title.chars().count() > 100 {
                return Err(AppError::Validation(
                    "Title must be between 1 and 100 characters.".to_string(),
                ));
            }
        }
        if let Some(year) = self.book_published_year {
            validate_published_year(year)?;
        }
        let genre = self.book_genre.as_deref().map(str::parse::<Genre>).transpose()?;

        Ok(BookChanges {
            title: self.book_title,
            published_year: self.book_published_year,
            genre,
            author_id: self.book_author_id,
        })
    }
}

impl BookChanges {
    pub fn is_empty(&self) -> bool {
        self.changed_columns().is_empty()
    }

    /// Columns this change set writes, in bind order
    pub fn changed_columns(&self) -> Vec<&'static str> {
        let mut columns = Vec::new();
        if self.title.is_some() {
            columns.push("title");
        }
        if self.published_year.is_some() {
            columns.push("published_year");
        }
        if self.genre.is_some() {
            columns.push("genre");
        }
        if self.author_id.is_some() {
            columns.push("author_id");
        }
        columns
    }
}

/// Book search parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// Exact author ID
    pub author_id: Option<String>,
    /// Case-insensitive substring of the genre
    pub genre: Option<String>,
    /// Exact publication year
    pub year: Option<i32>,
}

/// Search filters after parsing
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BookFilter {
    pub title: Option<String>,
    pub author_id: Option<i32>,
    pub genre: Option<String>,
    pub year: Option<i32>,
}

impl BookQuery {
    pub fn into_filter(self) -> AppResult<BookFilter> {
        let author_id = match self.author_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<i32>().map_err(|_| {
                AppError::Validation(format!("Invalid author_id: {}", raw))
            })?),
        };

        Ok(BookFilter {
            title: self.title.filter(|t| !t.is_empty()),
            author_id,
            genre: self.genre.filter(|g| !g.is_empty()),
            year: self.year,
        })
    }
}
