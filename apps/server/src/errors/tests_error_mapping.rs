// Mapping from domain errors to HTTP problem codes, no HTTP or DB involved
use crate::domain::{Guid, PlayerId};
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind};
use crate::{AppError, ErrorCode};

#[test]
fn maps_move_errors() {
    let app: AppError = DomainError::illegal_move("e2e5").into();
    assert_eq!(app.code(), ErrorCode::IllegalMove);
    assert_eq!(app.status().as_u16(), 422);

    let app: AppError = DomainError::NotPlayersTurn {
        player: PlayerId(2),
        guid: Guid::new(),
    }
    .into();
    assert_eq!(app.code().as_str(), "NOT_PLAYERS_TURN");
    assert_eq!(app.status().as_u16(), 409);
}

#[test]
fn maps_not_found() {
    let app: AppError = DomainError::GameNotFound(Guid::new()).into();
    assert_eq!(app.code(), ErrorCode::GameNotFound);
    assert_eq!(app.status().as_u16(), 404);

    let app: AppError = DomainError::PlayerNotFound("bob".into()).into();
    assert_eq!(app.code(), ErrorCode::PlayerNotFound);
}

#[test]
fn maps_conflicts() {
    let app: AppError = DomainError::conflict(ConflictKind::UsernameTaken, "taken").into();
    assert_eq!(app.code().as_str(), "USERNAME_TAKEN");
    assert_eq!(app.status().as_u16(), 409);

    let app: AppError =
        DomainError::conflict(ConflictKind::Other("x".into()), "generic conflict").into();
    assert_eq!(app.code().as_str(), "CONFLICT");
}

#[test]
fn maps_infra() {
    let app: AppError = DomainError::infra(InfraErrorKind::DbUnavailable, "down").into();
    assert_eq!(app.code().as_str(), "DB_UNAVAILABLE");
    assert_eq!(app.status().as_u16(), 503);

    let app: AppError = DomainError::corrupt("bad board").into();
    assert_eq!(app.code().as_str(), "DATA_CORRUPTION");
    assert_eq!(app.status().as_u16(), 500);

    let app: AppError = DomainError::infra(InfraErrorKind::Other("?".into()), "other").into();
    assert_eq!(app.code(), ErrorCode::Internal);
}

#[test]
fn bad_credentials_are_unauthorized() {
    let app: AppError = DomainError::InvalidCredentials.into();
    assert!(matches!(app, AppError::Unauthorized));
    assert_eq!(app.status().as_u16(), 401);
}
