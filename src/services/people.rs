//! People (patrons) service

use validator::{Validate, ValidationErrors};

use crate::{
    error::{AppError, AppResult},
    models::{Person, PersonForm},
    repository::Repository,
};

use super::validation::validate_unique_name;

#[derive(Clone)]
pub struct PeopleService {
    repository: Repository,
}

impl PeopleService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn find_all(&self) -> AppResult<Vec<Person>> {
        self.repository.people.find_all().await
    }

    pub async fn find_one(&self, id: i32) -> AppResult<Person> {
        self.repository
            .people
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Person with id {} not found", id)))
    }

    /// Register a person. Field rules and name uniqueness are reported
    /// together.
    pub async fn create(&self, form: PersonForm) -> AppResult<Person> {
        let mut errors = form.validate().err().unwrap_or_else(ValidationErrors::new);
        if let Err(taken) = validate_unique_name(&form.name, &*self.repository.people).await? {
            errors.add("name", taken);
        }
        if !errors.is_empty() {
            return Err(errors.into());
        }

        let person = self.repository.people.insert(&form).await?;
        tracing::info!("Created person {} \"{}\"", person.id, person.name);
        Ok(person)
    }

    /// Replace name and year of birth.
    ///
    /// Name uniqueness is only enforced on create.
    pub async fn update(&self, id: i32, form: PersonForm) -> AppResult<Person> {
        form.validate()?;
        self.repository
            .people
            .update(id, &form)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Person with id {} not found", id)))
    }

    /// Delete a person; any books they hold go back on the shelf
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        if !self.repository.people.delete(id).await? {
            return Err(AppError::NotFound(format!("Person with id {} not found", id)));
        }
        tracing::info!("Deleted person {}", id);
        Ok(())
    }
}
