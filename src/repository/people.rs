//! People repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::PersonStore;
use crate::{
    error::{AppError, AppResult},
    models::{Person, PersonForm},
};

#[derive(Clone)]
pub struct PeopleRepository {
    pool: Pool<Postgres>,
}

impl PeopleRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersonStore for PeopleRepository {
    async fn find_all(&self) -> AppResult<Vec<Person>> {
        let people = sqlx::query_as::<_, Person>(
            "SELECT id, name, year_of_birth FROM people ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(people)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Person>> {
        let person = sqlx::query_as::<_, Person>(
            "SELECT id, name, year_of_birth FROM people WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(person)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Person>> {
        let person = sqlx::query_as::<_, Person>(
            "SELECT id, name, year_of_birth FROM people WHERE name = $1 ORDER BY id LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(person)
    }

    async fn insert(&self, person: &PersonForm) -> AppResult<Person> {
        let created = sqlx::query_as::<_, Person>(
            r#"
            INSERT INTO people (name, year_of_birth)
            VALUES ($1, $2)
            RETURNING id, name, year_of_birth
            "#,
        )
        .bind(&person.name)
        .bind(person.year_of_birth)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from_store)?;

        Ok(created)
    }

    async fn update(&self, id: i32, person: &PersonForm) -> AppResult<Option<Person>> {
        let updated = sqlx::query_as::<_, Person>(
            r#"
            UPDATE people SET name = $1, year_of_birth = $2
            WHERE id = $3
            RETURNING id, name, year_of_birth
            "#,
        )
        .bind(&person.name)
        .bind(person.year_of_birth)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from_store)?;

        Ok(updated)
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let released = sqlx::query(
            "UPDATE books SET person_id = NULL, taken_at = NULL WHERE person_id = $1",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let deleted = sqlx::query("DELETE FROM people WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::from_store)?;

        tx.commit().await?;

        if released.rows_affected() > 0 {
            tracing::info!(
                "Released {} book(s) held by deleted person {}",
                released.rows_affected(),
                id
            );
        }

        Ok(deleted.rows_affected() > 0)
    }
}
