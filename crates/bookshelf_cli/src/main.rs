//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `bookshelf_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use bookshelf_core::db::open_db_in_memory;
use bookshelf_core::{BookService, Price, SqliteBookRepository};

fn main() {
    println!("bookshelf_core version={}", bookshelf_core::core_version());

    // Tiny in-memory round-trip to validate core crate wiring independently
    // of any embedding application.
    let conn = match open_db_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("smoke failed: {err}");
            std::process::exit(1);
        }
    };

    let outcome = SqliteBookRepository::try_new(&conn)
        .map(BookService::new)
        .and_then(|service| {
            service.add_book("Dune", Price::from_minor_units(1999))?;
            service.list_books()
        });

    match outcome {
        Ok(books) => println!("bookshelf_core smoke books={}", books.len()),
        Err(err) => {
            eprintln!("smoke failed: {err}");
            std::process::exit(1);
        }
    }
}
