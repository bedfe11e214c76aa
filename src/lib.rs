//! User administration service.
//!
//! A small admin module over a user store: list users, render a password
//! edit form, update a user's password, and an explicitly unimplemented
//! delete endpoint. The update path is the heart of the crate: CSRF
//! validation, input sanitization, Argon2 hashing, persistence, and
//! redirect/flash handling.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and logic
//! - **security**: CSRF token handling
//! - **services**: Application use cases and business logic
//! - **infra**: Infrastructure concerns (database, sessions)
//! - **api**: HTTP handlers, middleware, and routes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod security;
pub mod services;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, User};
pub use errors::{AppError, AppResult};
pub use infra::{Session, SessionStore};
