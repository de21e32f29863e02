//! Author model and related types

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Earliest accepted birth year
pub const MIN_BIRTH_YEAR: i32 = 1700;

const FULL_NAME_MAX_CHARS: usize = 100;

/// Full author model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub name: String,
    pub surname: String,
    /// Name and surname separated by a space, maintained by the database
    pub full_name: String,
    pub birth_date: NaiveDate,
    pub biography: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Wrapper for author listings
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthorList {
    pub authors: Vec<Author>,
}

/// Parse a `YYYY-MM-DD` birth date and check its year against [1700, current year].
pub fn parse_birth_date(value: &str) -> AppResult<NaiveDate> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Date must be in format YYYY-MM-DD.".to_string()))?;

    let current_year = Utc::now().year();
    if !(MIN_BIRTH_YEAR..=current_year).contains(&date.year()) {
        return Err(AppError::Validation(format!(
            "Author's birth date must be between {} and {}.",
            MIN_BIRTH_YEAR, current_year
        )));
    }
    Ok(date)
}

/// Same composition as the `full_name` column
pub fn compose_full_name(name: &str, surname: &str) -> String {
    format!("{} {}", name, surname)
}

fn check_full_name(name: &str, surname: &str) -> AppResult<()> {
    if compose_full_name(name, surname).chars().count() > FULL_NAME_MAX_CHARS {
        return Err(AppError::Validation(format!(
            "Author's full name must be at most {} characters.",
            FULL_NAME_MAX_CHARS
        )));
    }
    Ok(())
}

fn non_empty(value: &str, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("Author's {} must not be empty.", field)));
    }
    Ok(trimmed.to_string())
}

/// Create author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAuthor {
    #[validate(length(min = 1, message = "Author's name must not be empty."))]
    pub name: String,
    #[validate(length(min = 1, message = "Author's surname must not be empty."))]
    pub surname: String,
    /// Format YYYY-MM-DD, year between 1700 and the current year
    #[schema(example = "1920-01-02")]
    pub birth_date: String,
    pub biography: Option<String>,
}

/// A create request that passed every field rule
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuthor {
    pub name: String,
    pub surname: String,
    pub birth_date: NaiveDate,
    pub biography: Option<String>,
}

impl CreateAuthor {
    pub fn validated(self) -> AppResult<NewAuthor> {
        self.validate().map_err(super::validation_error)?;
        let name = non_empty(&self.name, "name")?;
        let surname = non_empty(&self.surname, "surname")?;
        check_full_name(&name, &surname)?;
        let birth_date = parse_birth_date(&self.birth_date)?;

        Ok(NewAuthor {
            name,
            surname,
            birth_date,
            biography: self.biography,
        })
    }
}

/// Update author query parameters; absent fields are left untouched
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UpdateAuthorParams {
    /// New first name
    pub author_name: Option<String>,
    /// New surname
    pub author_surname: Option<String>,
    /// New birth date (YYYY-MM-DD)
    pub author_birth_date: Option<String>,
    /// New biography
    pub author_biography: Option<String>,
}

/// Resolved column changes for an author
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorChanges {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub biography: Option<String>,
}

impl UpdateAuthorParams {
    /// Validate the supplied fields against the stored author.
    ///
    /// Name and surname are separate columns, so either one changes alone.
    pub fn resolve(self, existing: &Author) -> AppResult<AuthorChanges> {
        let name = self
            .author_name
            .as_deref()
            .map(|name| non_empty(name, "name"))
            .transpose()?;
        let surname = self
            .author_surname
            .as_deref()
            .map(|surname| non_empty(surname, "surname"))
            .transpose()?;

        if name.is_some() || surname.is_some() {
            check_full_name(
                name.as_deref().unwrap_or(&existing.name),
                surname.as_deref().unwrap_or(&existing.surname),
            )?;
        }

        let birth_date = self
            .author_birth_date
            .as_deref()
            .map(parse_birth_date)
            .transpose()?;

        Ok(AuthorChanges {
            name,
            surname,
            birth_date,
            biography: self.author_biography,
        })
    }
}

impl AuthorChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.surname.is_none()
            && self.birth_date.is_none()
            && self.biography.is_none()
    }
}
