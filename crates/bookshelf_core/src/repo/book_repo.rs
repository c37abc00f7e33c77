//! Book repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over canonical `books` storage.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths must call `Book::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - Listing returns rows in ascending id order.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::book::{Book, BookId, BookValidationError, Price};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const BOOK_SELECT_SQL: &str = "SELECT id, title, price FROM books";

const BOOKS_TABLE: &str = "books";
const REQUIRED_BOOK_COLUMNS: &[&str] = &["id", "title", "price"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for book persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(BookValidationError),
    Db(DbError),
    NotFound(BookId),
    /// An update was requested for a book that has never been persisted.
    MissingId,
    /// A mutation statement succeeded but touched no rows.
    NoRowsAffected(&'static str),
    InvalidData(String),
    /// The connection was handed over before schema migrations ran.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "book not found: {id}"),
            Self::MissingId => write!(f, "book has no id; persist it with create first"),
            Self::NoRowsAffected(operation) => {
                write!(f, "statement affected no rows during {operation}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted book data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version is {actual_version}, expected {expected_version}; run migrations before constructing the repository"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BookValidationError> for RepoError {
    fn from(value: BookValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for book CRUD operations.
pub trait BookRepository {
    /// Inserts a new book and returns the store-assigned id.
    fn create_book(&self, book: &Book) -> RepoResult<BookId>;
    /// Replaces title and price of the row matching `book.id`.
    fn update_book(&self, book: &Book) -> RepoResult<()>;
    /// Fetches one book by id; `Ok(None)` when no row matches.
    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>>;
    /// Lists all books in ascending id order.
    fn list_books(&self) -> RepoResult<Vec<Book>>;
    /// Deletes one book by id; returns whether a row was removed.
    fn delete_book(&self, id: BookId) -> RepoResult<bool>;
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Wraps a bootstrapped connection after verifying the schema it carries.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not contain the expected `books` shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        check_schema(conn)?;
        Ok(Self { conn })
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn create_book(&self, book: &Book) -> RepoResult<BookId> {
        book.validate()?;

        let changed = self.conn.execute(
            "INSERT INTO books (title, price) VALUES (?1, ?2);",
            params![book.title.as_str(), book.price.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NoRowsAffected("create"));
        }

        Ok(self.conn.last_insert_rowid())
    }

    fn update_book(&self, book: &Book) -> RepoResult<()> {
        let id = book.id.ok_or(RepoError::MissingId)?;
        book.validate()?;

        let changed = self.conn.execute(
            "UPDATE books SET title = ?1, price = ?2 WHERE id = ?3;",
            params![book.title.as_str(), book.price.to_string(), id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_book_row(row)?));
        }

        Ok(None)
    }

    fn list_books(&self) -> RepoResult<Vec<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} ORDER BY id ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.push(parse_book_row(row)?);
        }

        Ok(books)
    }

    fn delete_book(&self, id: BookId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM books WHERE id = ?1;", params![id])?;

        Ok(changed > 0)
    }
}

fn check_schema(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = latest_version();
    if actual_version == 0 {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            params![BOOKS_TABLE],
            |row| row.get(0),
        )
        .optional()?;
    if table_exists.is_none() {
        return Err(RepoError::MissingRequiredTable(BOOKS_TABLE));
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({BOOKS_TABLE});"))?;
    let mut rows = stmt.query([])?;
    let mut present = Vec::new();
    while let Some(row) = rows.next()? {
        present.push(row.get::<_, String>("name")?);
    }
    for &column in REQUIRED_BOOK_COLUMNS {
        if !present.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: BOOKS_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn parse_book_row(row: &Row<'_>) -> RepoResult<Book> {
    let id: BookId = row.get("id")?;
    let title: String = row.get("title")?;

    let price_text: String = row.get("price")?;
    let price = Price::from_str(&price_text).map_err(|err| {
        RepoError::InvalidData(format!(
            "invalid price value `{price_text}` in books.price: {err}"
        ))
    })?;

    let book = Book::with_id(id, title, price);
    book.validate()?;
    Ok(book)
}
