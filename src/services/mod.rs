//! Business logic services

pub mod books;
pub mod loans;
pub mod people;
pub mod validation;

use std::sync::Arc;

use crate::{clock::Clock, config::LoanConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
    pub people: people::PeopleService,
    pub loans: loans::LoansService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, clock: Arc<dyn Clock>, loan_config: &LoanConfig) -> Self {
        Self {
            books: books::BooksService::new(repository.clone()),
            people: people::PeopleService::new(repository.clone()),
            loans: loans::LoansService::new(repository, clock, loan_config),
        }
    }
}
