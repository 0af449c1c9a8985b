//! API handlers for the library catalog REST endpoints

pub mod books;
pub mod health;
pub mod openapi;
pub mod people;

use axum::{
    routing::{get, patch},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/search", get(books::search_books))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .patch(books::update_book)
                .delete(books::delete_book),
        )
        // Loans
        .route("/books/:id/owner", get(books::get_book_owner))
        .route("/books/:id/assign", patch(books::assign_book))
        .route("/books/:id/release", patch(books::release_book))
        // People
        .route("/people", get(people::list_people).post(people::create_person))
        .route(
            "/people/:id",
            get(people::get_person)
                .put(people::update_person)
                .patch(people::update_person)
                .delete(people::delete_person),
        )
        .route("/people/:id/books", get(people::get_person_books))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
