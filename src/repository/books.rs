//! Books repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::BookStore;
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookForm, BookOrder, Loan, PageRequest},
};

const BOOK_COLUMNS: &str = "id, title, author, year, person_id, taken_at";

/// Escape `LIKE` metacharacters so the text matches literally
pub(crate) fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn find_all(&self, order: BookOrder) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books ORDER BY {}",
            BOOK_COLUMNS,
            order.as_sql()
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn find_page(&self, order: BookOrder, page: PageRequest) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books ORDER BY {} LIMIT $1 OFFSET $2",
            BOOK_COLUMNS,
            order.as_sql()
        ))
        .bind(page.per_page())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE id = $1",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    async fn find_by_owner(&self, person_id: i32) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE person_id = $1 ORDER BY id",
            BOOK_COLUMNS
        ))
        .bind(person_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn search_by_title_prefix(&self, prefix: &str) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            r"SELECT {} FROM books WHERE title LIKE $1 ESCAPE '\' ORDER BY id",
            BOOK_COLUMNS
        ))
        .bind(format!("{}%", escape_like(prefix)))
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn insert(&self, book: &BookForm) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(&format!(
            "INSERT INTO books (title, author, year) VALUES ($1, $2, $3) RETURNING {}",
            BOOK_COLUMNS
        ))
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.year)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from_store)?;

        Ok(created)
    }

    async fn update(&self, id: i32, book: &BookForm) -> AppResult<Option<Book>> {
        let updated = sqlx::query_as::<_, Book>(&format!(
            "UPDATE books SET title = $1, author = $2, year = $3 WHERE id = $4 RETURNING {}",
            BOOK_COLUMNS
        ))
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.year)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from_store)?;

        Ok(updated)
    }

    async fn set_loan(&self, id: i32, loan: Option<Loan>) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let found: Option<i32> = sqlx::query_scalar("SELECT id FROM books WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        if found.is_none() {
            return Ok(false);
        }

        sqlx::query("UPDATE books SET person_id = $1, taken_at = $2 WHERE id = $3")
            .bind(loan.map(|l| l.person_id))
            .bind(loan.map(|l| l.taken_at))
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::from_store)?;

        tx.commit().await?;

        Ok(true)
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
