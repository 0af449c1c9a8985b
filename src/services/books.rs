//! Book catalog service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookDetails, BookForm, BookOrder, BookQuery, Person},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn find_all(&self, order: BookOrder) -> AppResult<Vec<Book>> {
        self.repository.books.find_all(order).await
    }

    /// List books, paginated only when the query carries both page parameters
    pub async fn list(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let order = query.order();
        match query.page_request()? {
            Some(page) => self.repository.books.find_page(order, page).await,
            None => self.find_all(order).await,
        }
    }

    pub async fn find_one(&self, id: i32) -> AppResult<Book> {
        self.repository
            .books
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Person holding the book, if it is on loan
    pub async fn owner(&self, id: i32) -> AppResult<Option<Person>> {
        let book = self.find_one(id).await?;
        self.owner_of(&book).await
    }

    /// Book together with its holder
    pub async fn details(&self, id: i32) -> AppResult<BookDetails> {
        let book = self.find_one(id).await?;
        let owner = self.owner_of(&book).await?;
        Ok(BookDetails { book, owner })
    }

    async fn owner_of(&self, book: &Book) -> AppResult<Option<Person>> {
        match book.loan()? {
            Some(loan) => self.repository.people.find_by_id(loan.person_id).await,
            None => Ok(None),
        }
    }

    pub async fn create(&self, form: BookForm) -> AppResult<Book> {
        form.validate()?;
        let book = self.repository.books.insert(&form).await?;
        tracing::info!("Created book {} \"{}\"", book.id, book.title);
        Ok(book)
    }

    /// Replace title, author and year; an active loan is kept as is
    pub async fn update(&self, id: i32, form: BookForm) -> AppResult<Book> {
        form.validate()?;
        self.repository
            .books
            .update(id, &form)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        if !self.repository.books.delete(id).await? {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        tracing::info!("Deleted book {}", id);
        Ok(())
    }

    /// Books whose title starts with `query` (case-sensitive)
    pub async fn search_by_title(&self, query: &str) -> AppResult<Vec<Book>> {
        self.repository.books.search_by_title_prefix(query).await
    }
}
