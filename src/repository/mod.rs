//! Repository layer for database operations
//!
//! Services talk to [`BookStore`] and [`PersonStore`]; the PostgreSQL
//! implementations live in [`books`] and [`people`], and [`memory`] keeps
//! everything in process for tests and throwaway instances.

pub mod books;
pub mod memory;
pub mod people;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{Book, BookForm, BookOrder, Loan, PageRequest, Person, PersonForm},
};

/// Book persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn find_all(&self, order: BookOrder) -> AppResult<Vec<Book>>;

    async fn find_page(&self, order: BookOrder, page: PageRequest) -> AppResult<Vec<Book>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Book>>;

    /// Books currently held by a person, ordered by id
    async fn find_by_owner(&self, person_id: i32) -> AppResult<Vec<Book>>;

    /// Case-sensitive title prefix match, ordered by id
    async fn search_by_title_prefix(&self, prefix: &str) -> AppResult<Vec<Book>>;

    async fn insert(&self, book: &BookForm) -> AppResult<Book>;

    /// Replace title, author and year. Loan columns are left untouched.
    /// Returns `None` if the book does not exist.
    async fn update(&self, id: i32, book: &BookForm) -> AppResult<Option<Book>>;

    /// Set or clear the loan columns together. Returns `false` if the book
    /// does not exist.
    async fn set_loan(&self, id: i32, loan: Option<Loan>) -> AppResult<bool>;

    async fn delete(&self, id: i32) -> AppResult<bool>;
}

/// Person persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PersonStore: Send + Sync {
    async fn find_all(&self) -> AppResult<Vec<Person>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Person>>;

    /// Exact, case-sensitive full name match
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Person>>;

    async fn insert(&self, person: &PersonForm) -> AppResult<Person>;

    async fn update(&self, id: i32, person: &PersonForm) -> AppResult<Option<Person>>;

    /// Delete a person, first returning every book they hold to the shelf.
    /// Both happen in one transaction. Returns `false` if the person does
    /// not exist.
    async fn delete(&self, id: i32) -> AppResult<bool>;
}

/// Main repository struct holding the stores
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookStore>,
    pub people: Arc<dyn PersonStore>,
}

impl Repository {
    /// Create a PostgreSQL-backed repository with the given pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            people: Arc::new(people::PeopleRepository::new(pool)),
        }
    }

    /// Create a repository backed by a fresh in-memory store
    pub fn in_memory() -> Self {
        let store = memory::MemoryStore::new();
        Self {
            books: Arc::new(store.clone()),
            people: Arc::new(store),
        }
    }

    pub fn from_stores(books: Arc<dyn BookStore>, people: Arc<dyn PersonStore>) -> Self {
        Self { books, people }
    }
}
