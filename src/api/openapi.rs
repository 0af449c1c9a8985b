//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, people};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library Catalog API",
        version = "0.1.0",
        description = "Books, patrons and loans"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::search_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Loans
        books::get_book_owner,
        books::assign_book,
        books::release_book,
        people::get_person_books,
        // People
        people::list_people,
        people::get_person,
        people::create_person,
        people::update_person,
        people::delete_person,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::BookForm,
            crate::models::book::BookDetails,
            // People
            crate::models::person::Person,
            crate::models::person::PersonForm,
            crate::models::person::PersonDetails,
            // Loans
            books::AssignRequest,
            books::LoanResponse,
            crate::services::loans::LoanOutcome,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book catalog"),
        (name = "people", description = "Patrons"),
        (name = "loans", description = "Lending books to patrons")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
