//! Book catalog and loan endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookDetails, BookForm, BookQuery, SearchQuery},
        person::Person,
    },
    services::loans::LoanOutcome,
    AppState,
};

/// Assign book request
#[derive(Deserialize, ToSchema)]
pub struct AssignRequest {
    /// Person who takes the book
    pub person_id: i32,
}

/// Loan mutation response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoanResponse {
    pub book_id: i32,
    /// `applied`, or `book_not_found` when there was nothing to change
    pub outcome: LoanOutcome,
    pub message: String,
}

/// List books, optionally sorted by year and paginated
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "List of books", body = Vec<Book>),
        (status = 400, description = "Invalid pagination parameters")
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.list(&query).await?;
    Ok(Json(books))
}

/// Search books by title prefix
#[utoipa::path(
    get,
    path = "/books/search",
    tag = "books",
    params(SearchQuery),
    responses(
        (status = 200, description = "Books whose title starts with the query", body = Vec<Book>)
    )
)]
pub async fn search_books(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.search_by_title(&query.query).await?;
    Ok(Json(books))
}

/// Get a book and its current holder
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookDetails),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDetails>> {
    let details = state.services.books.details(id).await?;
    Ok(Json(details))
}

/// Person currently holding a book
#[utoipa::path(
    get,
    path = "/books/{id}/owner",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Holder, or null when the book is on the shelf", body = Option<Person>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book_owner(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Option<Person>>> {
    let owner = state.services.books.owner(id).await?;
    Ok(Json(owner))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookForm,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 422, description = "Invalid fields", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Json(form): Json<BookForm>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let created = state.services.books.create(form).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a book's title, author and year
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = BookForm,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 404, description = "Book not found"),
        (status = 422, description = "Invalid fields", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(form): Json<BookForm>,
) -> AppResult<Json<Book>> {
    let updated = state.services.books.update(id, form).await?;
    Ok(Json(updated))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.books.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Lend a book to a person
#[utoipa::path(
    patch,
    path = "/books/{id}/assign",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = AssignRequest,
    responses(
        (status = 200, description = "Assignment applied, or nothing to assign", body = LoanResponse),
        (status = 409, description = "Person does not exist")
    )
)]
pub async fn assign_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<AssignRequest>,
) -> AppResult<Json<LoanResponse>> {
    let outcome = state.services.loans.assign(id, request.person_id).await?;

    let message = match outcome {
        LoanOutcome::Applied => format!("Book assigned to person {}", request.person_id),
        LoanOutcome::BookNotFound => "No such book, nothing assigned".to_string(),
    };

    Ok(Json(LoanResponse {
        book_id: id,
        outcome,
        message,
    }))
}

/// Return a book to the shelf
#[utoipa::path(
    patch,
    path = "/books/{id}/release",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Release applied, or nothing to release", body = LoanResponse)
    )
)]
pub async fn release_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<LoanResponse>> {
    let outcome = state.services.loans.release(id).await?;

    let message = match outcome {
        LoanOutcome::Applied => "Book released".to_string(),
        LoanOutcome::BookNotFound => "No such book, nothing released".to_string(),
    };

    Ok(Json(LoanResponse {
        book_id: id,
        outcome,
        message,
    }))
}
