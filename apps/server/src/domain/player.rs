//! Player identity as seen by the core and the gateway.

use serde::{Deserialize, Serialize};

use super::ids::PlayerId;

/// A registered player. `token` is the opaque session handle clients
/// present to authenticate; it is not a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub token: String,
}

/// Player plus the stored password digest, only handed to the auth service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCredentials {
    pub player: Player,
    pub password_hash: String,
}

/// Input for creating a player record.
#[derive(Debug, Clone)]
pub struct NewPlayer {
    pub name: String,
    pub password_hash: String,
    pub token: String,
}

/// Public view of a player inside game snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
}

impl From<&Player> for PlayerSummary {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
        }
    }
}
