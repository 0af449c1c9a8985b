//! Book model and related types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::person::Person;
use crate::error::{AppError, AppResult};

/// Book row from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    /// Publication year
    pub year: i32,
    /// Person currently holding the book
    #[sqlx(rename = "person_id")]
    pub owner_id: Option<i32>,
    /// When the current loan started
    pub taken_at: Option<DateTime<Utc>>,
    /// Computed on read, never stored
    #[sqlx(default)]
    #[serde(default)]
    pub overdue: bool,
}

/// An active loan: who holds the book and since when
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Loan {
    pub person_id: i32,
    pub taken_at: DateTime<Utc>,
}

impl Loan {
    pub fn new(person_id: i32, taken_at: DateTime<Utc>) -> Self {
        Self { person_id, taken_at }
    }

    /// Absolute time between the start of the loan and `now`
    pub fn elapsed_at(&self, now: DateTime<Utc>) -> Duration {
        (now - self.taken_at).abs()
    }
}

impl Book {
    /// Current loan, if any.
    ///
    /// Owner and timestamp are set together or not at all; a row with only
    /// one of them is reported as an integrity error.
    pub fn loan(&self) -> AppResult<Option<Loan>> {
        match (self.owner_id, self.taken_at) {
            (Some(person_id), Some(taken_at)) => Ok(Some(Loan::new(person_id, taken_at))),
            (None, None) => Ok(None),
            (Some(person_id), None) => Err(AppError::Integrity(format!(
                "Book {} is held by person {} but has no loan timestamp",
                self.id, person_id
            ))),
            (None, Some(_)) => Err(AppError::Integrity(format!(
                "Book {} has a loan timestamp but no holder",
                self.id
            ))),
        }
    }

    /// Whether the loan has lasted strictly longer than `limit` at `now`.
    pub fn is_overdue_at(&self, now: DateTime<Utc>, limit: Duration) -> AppResult<bool> {
        Ok(self
            .loan()?
            .map(|loan| loan.elapsed_at(now) > limit)
            .unwrap_or(false))
    }

    /// Replace the loan columns; `None` puts the book back on the shelf.
    pub fn set_loan(&mut self, loan: Option<Loan>) {
        self.owner_id = loan.map(|l| l.person_id);
        self.taken_at = loan.map(|l| l.taken_at);
    }
}

/// Create/update book request
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct BookForm {
    #[validate(length(min = 2, max = 150, message = "Title must be between 2 and 150 characters long"))]
    pub title: String,
    #[validate(length(min = 2, max = 150, message = "Author name must be between 2 and 150 characters long"))]
    pub author: String,
    #[validate(range(min = 1500, message = "Year must be greater than 1500"))]
    pub year: i32,
}

/// Book with its current holder, for the detail view
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookDetails {
    pub book: Book,
    pub owner: Option<Person>,
}

/// Sort order for book listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookOrder {
    #[default]
    Id,
    /// Publication year ascending, ties by id
    Year,
}

impl BookOrder {
    pub fn from_sort_by_year(sort_by_year: bool) -> Self {
        if sort_by_year {
            BookOrder::Year
        } else {
            BookOrder::Id
        }
    }

    /// ORDER BY clause for this ordering
    pub fn as_sql(&self) -> &'static str {
        match self {
            BookOrder::Id => "id",
            BookOrder::Year => "year, id",
        }
    }
}

/// Zero-based page of a listing, checked on construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    per_page: i64,
    offset: i64,
}

impl PageRequest {
    pub fn new(page: i64, per_page: i64) -> AppResult<Self> {
        if page < 0 {
            return Err(AppError::BadRequest("page must not be negative".to_string()));
        }
        if per_page < 1 {
            return Err(AppError::BadRequest(
                "books_per_page must be at least 1".to_string(),
            ));
        }
        let offset = page
            .checked_mul(per_page)
            .ok_or_else(|| AppError::BadRequest("page is out of range".to_string()))?;

        Ok(Self { per_page, offset })
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

/// Book listing query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Order by publication year
    pub sort_by_year: Option<bool>,
    /// Zero-based page index (requires books_per_page)
    pub page: Option<i64>,
    /// Page size (requires page)
    pub books_per_page: Option<i64>,
}

impl BookQuery {
    pub fn order(&self) -> BookOrder {
        BookOrder::from_sort_by_year(self.sort_by_year.unwrap_or(false))
    }

    /// Pagination applies only when both `page` and `books_per_page` are given.
    pub fn page_request(&self) -> AppResult<Option<PageRequest>> {
        match (self.page, self.books_per_page) {
            (Some(page), Some(per_page)) => PageRequest::new(page, per_page).map(Some),
            _ => Ok(None),
        }
    }
}

/// Title search parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct SearchQuery {
    /// Case-sensitive title prefix
    pub query: String,
}
