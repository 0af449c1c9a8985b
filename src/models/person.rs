//! Person (patron) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::book::Book;

/// Person row from database.
///
/// Held books are not stored here; they are looked up by owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Person {
    pub id: i32,
    /// Full name, unique among people
    pub name: String,
    pub year_of_birth: i32,
}

/// Create/update person request
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct PersonForm {
    #[validate(length(min = 2, max = 150, message = "Name must be between 2 and 150 characters long"))]
    pub name: String,
    #[validate(range(min = 1900, message = "Year of birth must be greater than 1900"))]
    pub year_of_birth: i32,
}

/// Person with the books they currently hold
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PersonDetails {
    pub person: Person,
    pub books: Vec<Book>,
}
