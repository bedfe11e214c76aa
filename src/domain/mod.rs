//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod password;
pub mod sanitize;
pub mod user;

pub use password::Password;
pub use sanitize::{escape_markup, sanitize_password};
pub use user::{UpdatePassword, User, UserListEntry};
