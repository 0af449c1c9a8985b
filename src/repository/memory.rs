//! In-process store implementing both [`BookStore`] and [`PersonStore`].
//!
//! Mirrors the PostgreSQL schema rules that matter to callers: ids are
//! assigned on insert, a loan must reference an existing person, and
//! deleting a person returns their books to the shelf.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::{BookStore, PersonStore};
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookForm, BookOrder, Loan, PageRequest, Person, PersonForm},
};

#[derive(Debug, Default)]
struct MemoryState {
    books: BTreeMap<i32, Book>,
    people: BTreeMap<i32, Person>,
    last_book_id: i32,
    last_person_id: i32,
}

impl MemoryState {
    fn sorted_books(&self, order: BookOrder) -> Vec<Book> {
        // BTreeMap iteration is already id-ordered
        let mut books: Vec<Book> = self.books.values().cloned().collect();
        if order == BookOrder::Year {
            books.sort_by_key(|b| (b.year, b.id));
        }
        books
    }
}

/// Shared in-memory store; clones see the same data
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn find_all(&self, order: BookOrder) -> AppResult<Vec<Book>> {
        Ok(self.state().sorted_books(order))
    }

    async fn find_page(&self, order: BookOrder, page: PageRequest) -> AppResult<Vec<Book>> {
        let books = self.state().sorted_books(order);
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.per_page()).unwrap_or(0);
        Ok(books.into_iter().skip(offset).take(limit).collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Book>> {
        Ok(self.state().books.get(&id).cloned())
    }

    async fn find_by_owner(&self, person_id: i32) -> AppResult<Vec<Book>> {
        Ok(self
            .state()
            .books
            .values()
            .filter(|b| b.owner_id == Some(person_id))
            .cloned()
            .collect())
    }

    async fn search_by_title_prefix(&self, prefix: &str) -> AppResult<Vec<Book>> {
        Ok(self
            .state()
            .books
            .values()
            .filter(|b| b.title.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn insert(&self, book: &BookForm) -> AppResult<Book> {
        let mut state = self.state();
        state.last_book_id += 1;
        let created = Book {
            id: state.last_book_id,
            title: book.title.clone(),
            author: book.author.clone(),
            year: book.year,
            owner_id: None,
            taken_at: None,
            overdue: false,
        };
        state.books.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: i32, book: &BookForm) -> AppResult<Option<Book>> {
        let mut state = self.state();
        Ok(state.books.get_mut(&id).map(|existing| {
            existing.title = book.title.clone();
            existing.author = book.author.clone();
            existing.year = book.year;
            existing.clone()
        }))
    }

    async fn set_loan(&self, id: i32, loan: Option<Loan>) -> AppResult<bool> {
        let mut state = self.state();
        if let Some(loan) = loan {
            if state.books.contains_key(&id) && !state.people.contains_key(&loan.person_id) {
                return Err(AppError::Integrity(format!(
                    "Person {} does not exist",
                    loan.person_id
                )));
            }
        }
        match state.books.get_mut(&id) {
            Some(book) => {
                book.set_loan(loan);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        Ok(self.state().books.remove(&id).is_some())
    }
}

#[async_trait]
impl PersonStore for MemoryStore {
    async fn find_all(&self) -> AppResult<Vec<Person>> {
        Ok(self.state().people.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Person>> {
        Ok(self.state().people.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Person>> {
        Ok(self
            .state()
            .people
            .values()
            .find(|p| p.name == name)
            .cloned())
    }

    async fn insert(&self, person: &PersonForm) -> AppResult<Person> {
        let mut state = self.state();
        state.last_person_id += 1;
        let created = Person {
            id: state.last_person_id,
            name: person.name.clone(),
            year_of_birth: person.year_of_birth,
        };
        state.people.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: i32, person: &PersonForm) -> AppResult<Option<Person>> {
        let mut state = self.state();
        Ok(state.people.get_mut(&id).map(|existing| {
            existing.name = person.name.clone();
            existing.year_of_birth = person.year_of_birth;
            existing.clone()
        }))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let mut state = self.state();
        if state.people.remove(&id).is_none() {
            return Ok(false);
        }
        for book in state.books.values_mut() {
            if book.owner_id == Some(id) {
                book.set_loan(None);
            }
        }
        Ok(true)
    }
}
