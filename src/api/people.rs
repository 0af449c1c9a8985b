//! People (patrons) endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        book::Book,
        person::{Person, PersonDetails, PersonForm},
    },
    AppState,
};

/// List all people
#[utoipa::path(
    get,
    path = "/people",
    tag = "people",
    responses(
        (status = 200, description = "List of people", body = Vec<Person>)
    )
)]
pub async fn list_people(State(state): State<AppState>) -> AppResult<Json<Vec<Person>>> {
    let people = state.services.people.find_all().await?;
    Ok(Json(people))
}

/// Get a person and the books they hold
#[utoipa::path(
    get,
    path = "/people/{id}",
    tag = "people",
    params(
        ("id" = i32, Path, description = "Person ID")
    ),
    responses(
        (status = 200, description = "Person with held books, overdue flags computed", body = PersonDetails),
        (status = 404, description = "Person not found")
    )
)]
pub async fn get_person(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<PersonDetails>> {
    let person = state.services.people.find_one(id).await?;
    let books = state.services.loans.books_for_person(id).await?;
    Ok(Json(PersonDetails { person, books }))
}

/// Books held by a person
#[utoipa::path(
    get,
    path = "/people/{id}/books",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Person ID")
    ),
    responses(
        (status = 200, description = "Held books, empty for an unknown person", body = Vec<Book>)
    )
)]
pub async fn get_person_books(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.loans.books_for_person(id).await?;
    Ok(Json(books))
}

/// Register a person
#[utoipa::path(
    post,
    path = "/people",
    tag = "people",
    request_body = PersonForm,
    responses(
        (status = 201, description = "Person created", body = Person),
        (status = 422, description = "Invalid fields or name already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_person(
    State(state): State<AppState>,
    Json(form): Json<PersonForm>,
) -> AppResult<(StatusCode, Json<Person>)> {
    let created = state.services.people.create(form).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a person
#[utoipa::path(
    put,
    path = "/people/{id}",
    tag = "people",
    params(
        ("id" = i32, Path, description = "Person ID")
    ),
    request_body = PersonForm,
    responses(
        (status = 200, description = "Person updated", body = Person),
        (status = 404, description = "Person not found"),
        (status = 422, description = "Invalid fields", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_person(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(form): Json<PersonForm>,
) -> AppResult<Json<Person>> {
    let updated = state.services.people.update(id, form).await?;
    Ok(Json(updated))
}

/// Delete a person, returning their books to the shelf
#[utoipa::path(
    delete,
    path = "/people/{id}",
    tag = "people",
    params(
        ("id" = i32, Path, description = "Person ID")
    ),
    responses(
        (status = 204, description = "Person deleted"),
        (status = 404, description = "Person not found")
    )
)]
pub async fn delete_person(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.people.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
