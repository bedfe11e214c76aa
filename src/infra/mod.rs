//! Infrastructure layer - External systems integration
//!
//! This module handles the application's external concerns:
//! - Database connection and repositories
//! - Per-visitor session storage

pub mod db;
pub mod repositories;
pub mod session;

pub use db::{Database, Migrator};
pub use repositories::{UserRepository, UserStore};
pub use session::{Session, SessionStore};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockUserRepository;
