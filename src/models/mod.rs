//! Data models for the library catalog

pub mod book;
pub mod person;

// Re-export commonly used types
pub use book::{Book, BookDetails, BookForm, BookOrder, BookQuery, Loan, PageRequest};
pub use person::{Person, PersonDetails, PersonForm};
