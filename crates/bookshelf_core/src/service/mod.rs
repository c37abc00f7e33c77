//! Use-case services orchestrating repository operations.
//!
//! # Responsibility
//! - Offer storage-agnostic entry points to embedding applications.
//! - Keep orchestration free of SQL details.

pub mod book_service;
