//! Domain-level error type used across the core, the stores and the gateway.
//!
//! This error type is transport- and DB-agnostic. HTTP handlers convert it to
//! `AppError` via `From<DomainError>`; the WebSocket gateway maps it onto
//! protocol error codes.

use thiserror::Error;

use crate::domain::{Guid, PlayerId};

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    DbUnavailable,
    /// A stored board or record could not be decoded.
    DataCorruption,
    Other(String),
}

/// Domain-level conflict kinds
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    UsernameTaken,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("game {0} not found")]
    GameNotFound(Guid),
    #[error("illegal move: {0}")]
    IllegalMove(String),
    #[error("it is not the turn of player {player} in game {guid}")]
    NotPlayersTurn { player: PlayerId, guid: Guid },
    #[error("player {0} is not part of game {1}")]
    NotParticipant(PlayerId, Guid),
    #[error("player not found: {0}")]
    PlayerNotFound(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    /// Input/user validation failure
    #[error("validation error: {0}")]
    Validation(String),
    #[error("conflict {0:?}: {1}")]
    Conflict(ConflictKind, String),
    /// Store/engine failures; never retried by the core
    #[error("infra {0:?}: {1}")]
    Infra(InfraErrorKind, String),
}

impl DomainError {
    pub fn illegal_move(detail: impl Into<String>) -> Self {
        Self::IllegalMove(detail.into())
    }
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation(detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }
    pub fn corrupt(detail: impl Into<String>) -> Self {
        Self::Infra(InfraErrorKind::DataCorruption, detail.into())
    }

    /// True for failures of a collaborator rather than of the request.
    pub fn is_infra(&self) -> bool {
        matches!(self, DomainError::Infra(..))
    }
}
