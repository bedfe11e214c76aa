//! Request security primitives.

pub mod csrf;

pub use csrf::{CsrfToken, CsrfTokenManager};
