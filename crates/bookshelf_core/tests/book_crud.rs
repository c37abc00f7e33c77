use bookshelf_core::db::migrations::latest_version;
use bookshelf_core::db::open_db_in_memory;
use bookshelf_core::{
    Book, BookRepository, BookService, Price, RepoError, SqliteBookRepository,
};
use rusqlite::Connection;
use std::str::FromStr;

fn price(text: &str) -> Price {
    Price::from_str(text).unwrap()
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let book = Book::new("Dune", price("19.99"));
    let id = repo.create_book(&book).unwrap();

    let loaded = repo.get_book(id).unwrap().unwrap();
    assert_eq!(loaded.id, Some(id));
    assert_eq!(loaded.title, "Dune");
    assert_eq!(loaded.price, price("19.99"));
    assert_eq!(loaded.price.to_string(), "19.99");
}

#[test]
fn create_assigns_distinct_ascending_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let first = repo.create_book(&Book::new("Dune", price("19.99"))).unwrap();
    let second = repo
        .create_book(&Book::new("Dune Messiah", price("14.50")))
        .unwrap();

    assert!(second > first);
}

#[test]
fn create_ignores_preassigned_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let book = Book::with_id(42, "Hyperion", price("9.99"));
    let id = repo.create_book(&book).unwrap();

    assert_ne!(id, 42);
    let loaded = repo.get_book(id).unwrap().unwrap();
    assert_eq!(loaded.title, "Hyperion");
}

#[test]
fn get_missing_book_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    assert!(repo.get_book(1).unwrap().is_none());
}

#[test]
fn update_existing_book_replaces_title_and_price() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let id = repo.create_book(&Book::new("Dune", price("19.99"))).unwrap();

    let updated = Book::with_id(id, "Dune (Deluxe)", price("24.99"));
    repo.update_book(&updated).unwrap();

    let loaded = repo.get_book(id).unwrap().unwrap();
    assert_eq!(loaded.title, "Dune (Deluxe)");
    assert_eq!(loaded.price, price("24.99"));
    assert_eq!(loaded.price.to_string(), "24.99");
}

#[test]
fn update_not_found_returns_not_found_and_leaves_store_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let id = repo.create_book(&Book::new("Dune", price("19.99"))).unwrap();

    let missing = Book::with_id(id + 1000, "Ghost", price("1.00"));
    let err = repo.update_book(&missing).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(found_id) if found_id == id + 1000));

    let books = repo.list_books().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title, "Dune");
}

#[test]
fn update_without_id_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let unpersisted = Book::new("Draft", price("5.00"));
    let err = repo.update_book(&unpersisted).unwrap_err();
    assert!(matches!(err, RepoError::MissingId));
}

#[test]
fn delete_then_get_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let id = repo.create_book(&Book::new("Dune", price("19.99"))).unwrap();

    assert!(repo.delete_book(id).unwrap());
    assert!(repo.get_book(id).unwrap().is_none());
    assert!(!repo.delete_book(id).unwrap());
}

#[test]
fn delete_missing_id_returns_false_and_leaves_store_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let id = repo.create_book(&Book::new("Dune", price("19.99"))).unwrap();

    assert!(!repo.delete_book(id + 1000).unwrap());
    assert_eq!(repo.list_books().unwrap().len(), 1);
}

#[test]
fn list_returns_exact_set_in_ascending_id_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let first = repo.create_book(&Book::new("Dune", price("19.99"))).unwrap();
    let second = repo
        .create_book(&Book::new("Dune Messiah", price("14.50")))
        .unwrap();
    let third = repo
        .create_book(&Book::new("Children of Dune", price("12.00")))
        .unwrap();

    // Deleting the middle row leaves an id gap; listing must skip it without
    // erroring and keep ascending order.
    assert!(repo.delete_book(second).unwrap());

    let books = repo.list_books().unwrap();
    let ids: Vec<_> = books.iter().map(|book| book.id).collect();
    assert_eq!(ids, vec![Some(first), Some(third)]);
}

#[test]
fn list_on_empty_table_returns_empty_vec() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    assert!(repo.list_books().unwrap().is_empty());
}

#[test]
fn validation_failure_blocks_create_and_update() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let blank = Book::new("   ", price("10.00"));
    let create_err = repo.create_book(&blank).unwrap_err();
    assert!(matches!(create_err, RepoError::Validation(_)));

    let id = repo.create_book(&Book::new("Dune", price("19.99"))).unwrap();
    let negative = Book::with_id(id, "Dune", price("-0.01"));
    let update_err = repo.update_book(&negative).unwrap_err();
    assert!(matches!(update_err, RepoError::Validation(_)));

    let loaded = repo.get_book(id).unwrap().unwrap();
    assert_eq!(loaded.price, price("19.99"));
}

#[test]
fn invalid_persisted_price_is_rejected_on_read() {
    let conn = open_db_in_memory().unwrap();

    conn.execute(
        "INSERT INTO books (title, price) VALUES (?1, ?2);",
        rusqlite::params!["Corrupt", "not-a-price"],
    )
    .unwrap();

    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    let err = repo.get_book(1).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn catalog_lifecycle_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let id = repo.create_book(&Book::new("Dune", price("19.99"))).unwrap();
    assert_eq!(id, 1);

    let fetched = repo.get_book(id).unwrap().unwrap();
    assert_eq!(fetched, Book::with_id(1, "Dune", price("19.99")));

    repo.update_book(&Book::with_id(id, "Dune", price("24.99")))
        .unwrap();
    let updated = repo.get_book(id).unwrap().unwrap();
    assert_eq!(updated.price.to_string(), "24.99");

    assert!(repo.delete_book(id).unwrap());
    assert!(repo.get_book(id).unwrap().is_none());
}

#[test]
fn service_wraps_repository_calls() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    let service = BookService::new(repo);

    let created = service.add_book("Dune", price("19.99")).unwrap();
    let id = created.id.expect("add_book returns a persisted id");

    let fetched = service.get_book(id).unwrap().unwrap();
    assert_eq!(fetched, created);

    let listed = service.list_books().unwrap();
    assert_eq!(listed, vec![created]);

    assert!(service.delete_book(id).unwrap());
    assert!(service.get_book(id).unwrap().is_none());
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteBookRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_books_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteBookRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("books"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_books_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteBookRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "books",
            column: "price"
        })
    ));
}
