//! Book use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for callers of the core crate.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::book::{Book, BookId, Price};
use crate::repo::book_repo::{BookRepository, RepoResult};

/// Use-case service wrapper for book CRUD operations.
pub struct BookService<R: BookRepository> {
    repo: R,
}

impl<R: BookRepository> BookService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists a new book and returns it with the store-assigned id.
    pub fn add_book(&self, title: impl Into<String>, price: Price) -> RepoResult<Book> {
        let mut book = Book::new(title, price);
        let id = self.repo.create_book(&book)?;
        book.id = Some(id);
        Ok(book)
    }

    /// Creates a new book through repository persistence.
    pub fn create_book(&self, book: &Book) -> RepoResult<BookId> {
        self.repo.create_book(book)
    }

    /// Updates an existing book by id.
    ///
    /// Returns repository-level not-found or validation errors unchanged.
    pub fn update_book(&self, book: &Book) -> RepoResult<()> {
        self.repo.update_book(book)
    }

    /// Gets one book by id.
    pub fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        self.repo.get_book(id)
    }

    /// Lists all books in ascending id order.
    pub fn list_books(&self) -> RepoResult<Vec<Book>> {
        self.repo.list_books()
    }

    /// Deletes a book by id; returns whether a row was removed.
    pub fn delete_book(&self, id: BookId) -> RepoResult<bool> {
        self.repo.delete_book(id)
    }
}
