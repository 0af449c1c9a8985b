//! Cross-record validation rules

use validator::ValidationError;

use crate::{error::AppResult, repository::PersonStore};

pub const NAME_TAKEN_MESSAGE: &str = "these full names are already in use.";

/// Check that no person already uses `name` (exact, case-sensitive match).
///
/// The outer result carries store failures, the inner one the outcome for
/// the `name` field.
pub async fn validate_unique_name(
    name: &str,
    people: &dyn PersonStore,
) -> AppResult<Result<(), ValidationError>> {
    if people.find_by_name(name).await?.is_some() {
        let mut error = ValidationError::new("unique");
        error.message = Some(NAME_TAKEN_MESSAGE.into());
        return Ok(Err(error));
    }
    Ok(Ok(()))
}
