//! Error handling for the chess server.

pub mod domain;
pub mod error_code;

#[cfg(test)]
mod tests_error_mapping;

pub use domain::{ConflictKind, DomainError, InfraErrorKind};
pub use error_code::ErrorCode;
