//! # Book Repository
//!
//! Catalog reads for checkout and the storefront listing, plus the few
//! writes the seed tool and tests need. Catalog management itself lives
//! outside this service.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use folio_core::Book;

/// Repository for catalog entries.
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct BookRecord {
    id: String,
    title: String,
    author: String,
    price_cents: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BookRecord> for Book {
    fn from(r: BookRecord) -> Self {
        Book {
            id: r.id,
            title: r.title,
            author: r.author,
            price_cents: r.price_cents,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl BookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        BookRepository { pool }
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Book>> {
        let record = sqlx::query_as::<_, BookRecord>(
            r#"
            SELECT id, title, author, price_cents, created_at, updated_at
            FROM books
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Book::from))
    }

    /// Current price in cents, or `None` when the book is gone.
    pub async fn price_of(&self, id: &str) -> DbResult<Option<i64>> {
        let price: Option<i64> = sqlx::query_scalar("SELECT price_cents FROM books WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(price)
    }

    /// All books, ordered by title.
    pub async fn list(&self) -> DbResult<Vec<Book>> {
        let records = sqlx::query_as::<_, BookRecord>(
            r#"
            SELECT id, title, author, price_cents, created_at, updated_at
            FROM books
            ORDER BY title COLLATE NOCASE, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Book::from).collect())
    }

    pub async fn insert(&self, book: &Book) -> DbResult<()> {
        debug!(id = %book.id, title = %book.title, "Inserting book");

        sqlx::query(
            r#"
            INSERT INTO books (id, title, author, price_cents, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&book.id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.price_cents)
        .bind(book.created_at)
        .bind(book.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::UniqueViolation {
                field,
                value: book.id.clone(),
            },
            other => other,
        })?;

        Ok(())
    }

    /// Changes a book's price. Existing orders keep the price they froze.
    pub async fn update_price(&self, id: &str, price_cents: i64) -> DbResult<()> {
        let result = sqlx::query("UPDATE books SET price_cents = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(price_cents)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Book", id));
        }
        Ok(())
    }

    /// Removes a book. Carts still referencing it fail at checkout.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Book", id));
        }
        debug!(id = %id, "Book deleted");
        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn book(id: &str, title: &str, price_cents: i64) -> Book {
        let now = Utc::now();
        Book {
            id: id.to_string(),
            title: title.to_string(),
            author: "Anon".to_string(),
            price_cents,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_get_and_price() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let books = db.books();

        books.insert(&book("B1", "Dune", 1000)).await.unwrap();

        let fetched = books.get_by_id("B1").await.unwrap().unwrap();
        assert_eq!(fetched.title, "Dune");
        assert_eq!(books.price_of("B1").await.unwrap(), Some(1000));
        assert_eq!(books.price_of("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_insert_reports_id() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.books().insert(&book("B1", "Dune", 1000)).await.unwrap();

        let err = db.books().insert(&book("B1", "Dune", 1000)).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { value, .. } if value == "B1"));
    }

    #[tokio::test]
    async fn test_list_sorted_by_title() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.books().insert(&book("3", "1984", 2000)).await.unwrap();
        db.books().insert(&book("2", "Pride and Prejudice", 1500)).await.unwrap();
        db.books().insert(&book("1", "The Lord of the Rings", 2500)).await.unwrap();

        let titles: Vec<_> = db
            .books()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["1984", "Pride and Prejudice", "The Lord of the Rings"]);
        assert_eq!(db.books().count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.books().insert(&book("B1", "Dune", 1000)).await.unwrap();

        db.books().update_price("B1", 1200).await.unwrap();
        assert_eq!(db.books().price_of("B1").await.unwrap(), Some(1200));

        db.books().delete("B1").await.unwrap();
        assert!(db.books().get_by_id("B1").await.unwrap().is_none());
        assert!(matches!(
            db.books().delete("B1").await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_negative_price_rejected_by_schema() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.books().insert(&book("B1", "Dune", -1)).await.unwrap_err();
        assert!(matches!(err, DbError::ConstraintViolation(_)));
    }
}
