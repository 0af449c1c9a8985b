//! Loan management service
//!
//! A book is on loan when it has both a holder and a start timestamp.
//! Assigning and releasing always write the two together.

use std::sync::Arc;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    clock::Clock,
    config::LoanConfig,
    error::AppResult,
    models::{Book, Loan},
    repository::Repository,
};

/// Result of a loan mutation. A missing book is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoanOutcome {
    Applied,
    BookNotFound,
}

impl LoanOutcome {
    fn from_found(found: bool) -> Self {
        if found {
            LoanOutcome::Applied
        } else {
            LoanOutcome::BookNotFound
        }
    }

    pub fn is_applied(&self) -> bool {
        *self == LoanOutcome::Applied
    }
}

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    clock: Arc<dyn Clock>,
    overdue_after: Duration,
}

impl LoansService {
    pub fn new(repository: Repository, clock: Arc<dyn Clock>, config: &LoanConfig) -> Self {
        Self {
            repository,
            clock,
            overdue_after: config.overdue_after().unwrap_or_else(|| {
                tracing::warn!(
                    "Ignoring invalid overdue window of {} days, using the default",
                    config.overdue_after_days
                );
                Duration::days(LoanConfig::default().overdue_after_days)
            }),
        }
    }

    /// Lend a book to a person, starting the loan now.
    ///
    /// Overwrites any current loan on the book. The person id is not checked
    /// here; the store rejects a dangling reference.
    pub async fn assign(&self, book_id: i32, person_id: i32) -> AppResult<LoanOutcome> {
        let loan = Loan::new(person_id, self.clock.now());
        let found = self.repository.books.set_loan(book_id, Some(loan)).await?;

        let outcome = LoanOutcome::from_found(found);
        if outcome.is_applied() {
            tracing::info!("Book {} assigned to person {}", book_id, person_id);
        } else {
            tracing::debug!("Assign skipped: book {} does not exist", book_id);
        }
        Ok(outcome)
    }

    /// Return a book to the shelf
    pub async fn release(&self, book_id: i32) -> AppResult<LoanOutcome> {
        let found = self.repository.books.set_loan(book_id, None).await?;

        let outcome = LoanOutcome::from_found(found);
        if outcome.is_applied() {
            tracing::info!("Book {} released", book_id);
        } else {
            tracing::debug!("Release skipped: book {} does not exist", book_id);
        }
        Ok(outcome)
    }

    /// Books held by a person, with `overdue` computed for this read.
    ///
    /// An unknown person holds no books.
    pub async fn books_for_person(&self, person_id: i32) -> AppResult<Vec<Book>> {
        let Some(person) = self.repository.people.find_by_id(person_id).await? else {
            return Ok(Vec::new());
        };

        let now = self.clock.now();
        let mut books = self.repository.books.find_by_owner(person.id).await?;
        for book in &mut books {
            book.overdue = book.is_overdue_at(now, self.overdue_after)?;
        }

        Ok(books)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::FixedClock,
        error::AppError,
        models::{BookForm, PersonForm},
        repository::{MockBookStore, MockPersonStore},
    };
    use chrono::{DateTime, TimeZone, Utc};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
    }

    struct Fixture {
        repository: Repository,
        clock: FixedClock,
        loans: LoansService,
    }

    fn fixture() -> Fixture {
        let repository = Repository::in_memory();
        let clock = FixedClock::new(start());
        let loans = LoansService::new(
            repository.clone(),
            Arc::new(clock.clone()),
            &LoanConfig::default(),
        );
        Fixture {
            repository,
            clock,
            loans,
        }
    }

    async fn add_book(repository: &Repository, title: &str) -> Book {
        repository
            .books
            .insert(&BookForm {
                title: title.to_string(),
                author: "Fyodor Dostoevsky".to_string(),
                year: 1866,
            })
            .await
            .unwrap()
    }

    async fn add_person(repository: &Repository, name: &str) -> i32 {
        repository
            .people
            .insert(&PersonForm {
                name: name.to_string(),
                year_of_birth: 1985,
            })
            .await
            .unwrap()
            .id
    }

    async fn reload(repository: &Repository, id: i32) -> Book {
        repository.books.find_by_id(id).await.unwrap().unwrap()
    }

    fn assert_loan_consistent(book: &Book) {
        assert_eq!(book.owner_id.is_none(), book.taken_at.is_none());
    }

    #[tokio::test]
    async fn test_assign_sets_owner_and_timestamp() {
        let f = fixture();
        let book = add_book(&f.repository, "Crime and Punishment").await;
        let person = add_person(&f.repository, "Ivan Ivanov").await;

        let outcome = f.loans.assign(book.id, person).await.unwrap();
        assert_eq!(outcome, LoanOutcome::Applied);

        let book = reload(&f.repository, book.id).await;
        assert_eq!(book.owner_id, Some(person));
        assert_eq!(book.taken_at, Some(start()));
        assert_loan_consistent(&book);
    }

    #[tokio::test]
    async fn test_reassign_overwrites_previous_loan() {
        let f = fixture();
        let book = add_book(&f.repository, "Crime and Punishment").await;
        let first = add_person(&f.repository, "Ivan Ivanov").await;
        let second = add_person(&f.repository, "Petr Petrov").await;

        f.loans.assign(book.id, first).await.unwrap();
        f.clock.advance(Duration::days(2));
        f.loans.assign(book.id, second).await.unwrap();

        let book = reload(&f.repository, book.id).await;
        assert_eq!(book.owner_id, Some(second));
        assert_eq!(book.taken_at, Some(start() + Duration::days(2)));
    }

    #[tokio::test]
    async fn test_assign_then_release_clears_loan() {
        let f = fixture();
        let book = add_book(&f.repository, "Crime and Punishment").await;
        let person = add_person(&f.repository, "Ivan Ivanov").await;

        // from the shelf
        f.loans.assign(book.id, person).await.unwrap();
        f.loans.release(book.id).await.unwrap();
        let reloaded = reload(&f.repository, book.id).await;
        assert_eq!(reloaded.owner_id, None);
        assert_eq!(reloaded.taken_at, None);

        // from an existing loan
        f.loans.assign(book.id, person).await.unwrap();
        f.loans.assign(book.id, person).await.unwrap();
        f.loans.release(book.id).await.unwrap();
        let reloaded = reload(&f.repository, book.id).await;
        assert_eq!(reloaded.owner_id, None);
        assert_eq!(reloaded.taken_at, None);
    }

    #[tokio::test]
    async fn test_release_of_shelved_book_is_harmless() {
        let f = fixture();
        let book = add_book(&f.repository, "Crime and Punishment").await;

        let outcome = f.loans.release(book.id).await.unwrap();
        assert_eq!(outcome, LoanOutcome::Applied);
        assert_loan_consistent(&reload(&f.repository, book.id).await);
    }

    #[tokio::test]
    async fn test_missing_book_is_a_no_op() {
        let f = fixture();
        let book = add_book(&f.repository, "Crime and Punishment").await;
        let person = add_person(&f.repository, "Ivan Ivanov").await;
        let before = f.repository.books.find_all(Default::default()).await.unwrap();

        assert_eq!(
            f.loans.assign(999, person).await.unwrap(),
            LoanOutcome::BookNotFound
        );
        assert_eq!(
            f.loans.release(999).await.unwrap(),
            LoanOutcome::BookNotFound
        );

        let after = f.repository.books.find_all(Default::default()).await.unwrap();
        assert_eq!(before, after);
        assert_eq!(reload(&f.repository, book.id).await.owner_id, None);
    }

    #[tokio::test]
    async fn test_assign_to_unknown_person_is_rejected_by_store() {
        let f = fixture();
        let book = add_book(&f.repository, "Crime and Punishment").await;

        let result = f.loans.assign(book.id, 77).await;
        assert!(matches!(result, Err(AppError::Integrity(_))));
        assert_eq!(reload(&f.repository, book.id).await.owner_id, None);
    }

    #[tokio::test]
    async fn test_overdue_scenario() {
        let f = fixture();
        let b1 = add_book(&f.repository, "The Idiot").await;
        let b2 = add_book(&f.repository, "Demons").await;
        let p1 = add_person(&f.repository, "Ivan Ivanov").await;
        assert_eq!(p1, 1);

        // B1 taken 11 days before "now", B2 taken 3 days before
        f.loans.assign(b1.id, p1).await.unwrap();
        f.clock.advance(Duration::days(8));
        f.loans.assign(b2.id, p1).await.unwrap();
        f.clock.advance(Duration::days(3));

        let books = f.loans.books_for_person(1).await.unwrap();
        assert_eq!(books.len(), 2);
        let overdue: Vec<(i32, bool)> = books.iter().map(|b| (b.id, b.overdue)).collect();
        assert_eq!(overdue, vec![(b1.id, true), (b2.id, false)]);

        // flag is never written back
        assert!(!reload(&f.repository, b1.id).await.overdue);

        f.loans.release(b1.id).await.unwrap();
        let books = f.loans.books_for_person(1).await.unwrap();
        assert_eq!(books.iter().map(|b| b.id).collect::<Vec<_>>(), vec![b2.id]);
    }

    #[tokio::test]
    async fn test_overdue_boundary_is_strict() {
        let f = fixture();
        let book = add_book(&f.repository, "The Idiot").await;
        let person = add_person(&f.repository, "Ivan Ivanov").await;
        f.loans.assign(book.id, person).await.unwrap();

        f.clock.set(start() + Duration::days(9));
        assert!(!f.loans.books_for_person(person).await.unwrap()[0].overdue);

        f.clock.set(start() + Duration::days(10));
        assert!(!f.loans.books_for_person(person).await.unwrap()[0].overdue);

        f.clock.set(start() + Duration::days(10) + Duration::milliseconds(1));
        assert!(f.loans.books_for_person(person).await.unwrap()[0].overdue);

        f.clock.set(start() + Duration::days(11));
        assert!(f.loans.books_for_person(person).await.unwrap()[0].overdue);
    }

    #[tokio::test]
    async fn test_invalid_overdue_window_falls_back_to_default() {
        let repository = Repository::in_memory();
        let clock = FixedClock::new(start());
        let loans = LoansService::new(
            repository.clone(),
            Arc::new(clock.clone()),
            &LoanConfig {
                overdue_after_days: -3,
            },
        );
        let book = add_book(&repository, "The Idiot").await;
        let person = add_person(&repository, "Ivan Ivanov").await;
        loans.assign(book.id, person).await.unwrap();

        clock.set(start() + Duration::days(1));
        assert!(!loans.books_for_person(person).await.unwrap()[0].overdue);

        clock.set(start() + Duration::days(11));
        assert!(loans.books_for_person(person).await.unwrap()[0].overdue);
    }

    #[tokio::test]
    async fn test_unknown_person_holds_nothing() {
        let f = fixture();
        assert!(f.loans.books_for_person(404).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_held_book_without_timestamp_is_integrity_error() {
        let mut people = MockPersonStore::new();
        people.expect_find_by_id().returning(|id| {
            Ok(Some(crate::models::Person {
                id,
                name: "Ivan Ivanov".to_string(),
                year_of_birth: 1970,
            }))
        });
        let mut books = MockBookStore::new();
        books.expect_find_by_owner().returning(|person_id| {
            Ok(vec![Book {
                id: 5,
                title: "Demons".to_string(),
                author: "Fyodor Dostoevsky".to_string(),
                year: 1872,
                owner_id: Some(person_id),
                taken_at: None,
                overdue: false,
            }])
        });

        let loans = LoansService::new(
            Repository::from_stores(Arc::new(books), Arc::new(people)),
            Arc::new(FixedClock::new(start())),
            &LoanConfig::default(),
        );

        let result = loans.books_for_person(1).await;
        assert!(matches!(result, Err(AppError::Integrity(_))));
    }

    #[tokio::test]
    async fn test_assign_reports_missing_book_from_store() {
        let mut books = MockBookStore::new();
        books.expect_set_loan().times(1).returning(|_, _| Ok(false));

        let loans = LoansService::new(
            Repository::from_stores(Arc::new(books), Arc::new(MockPersonStore::new())),
            Arc::new(FixedClock::new(start())),
            &LoanConfig::default(),
        );

        assert_eq!(
            loans.assign(3, 1).await.unwrap(),
            LoanOutcome::BookNotFound
        );
    }
}
