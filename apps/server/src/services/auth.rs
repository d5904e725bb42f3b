//! Player registration, login and token authentication.
//!
//! Passwords are stored as `salt$digest`, where the salt is 16 random bytes
//! (base64, unpadded) and the digest is the hex blake3 hash of salt followed
//! by the password. Session tokens are random UUIDs in simple form.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{NewPlayer, Player};
use crate::errors::DomainError;
use crate::store::GameStore;

const MAX_NAME_LEN: usize = 32;

pub struct AuthService {
    store: Arc<dyn GameStore>,
}

impl AuthService {
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self { store }
    }

    pub async fn register(
        &self,
        name: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<Player, DomainError> {
        let name = name.trim();
        if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::validation(format!(
                "name must be 1 to {MAX_NAME_LEN} characters"
            )));
        }
        if password.is_empty() {
            return Err(DomainError::validation("password must not be empty"));
        }
        if password != password_confirm {
            return Err(DomainError::validation("passwords do not match"));
        }

        let player = self
            .store
            .create_player(NewPlayer {
                name: name.to_string(),
                password_hash: hash_password(password),
                token: Uuid::new_v4().simple().to_string(),
            })
            .await?;
        info!(player_id = %player.id, "player registered");
        Ok(player)
    }

    /// Returns the player (and with it the session token) for valid credentials.
    pub async fn login(&self, name: &str, password: &str) -> Result<Player, DomainError> {
        let Some(creds) = self.store.find_credentials(name.trim()).await? else {
            debug!("login for unknown name");
            return Err(DomainError::InvalidCredentials);
        };
        if !verify_password(password, &creds.password_hash) {
            debug!(player_id = %creds.player.id, "login with wrong password");
            return Err(DomainError::InvalidCredentials);
        }
        Ok(creds.player)
    }

    pub async fn authenticate(&self, token: &str) -> Result<Player, DomainError> {
        self.store
            .find_player_by_token(token.trim())
            .await?
            .ok_or(DomainError::InvalidCredentials)
    }
}

fn digest(salt: &[u8], password: &str) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize()
}

pub fn hash_password(password: &str) -> String {
    let salt: [u8; 16] = rand::random();
    format!(
        "{}${}",
        STANDARD_NO_PAD.encode(salt),
        digest(&salt, password).to_hex()
    )
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, hex)) = stored.split_once('$') else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (STANDARD_NO_PAD.decode(salt), blake3::Hash::from_hex(hex))
    else {
        return false;
    };
    // blake3::Hash equality is constant time
    digest(&salt, password) == expected
}
