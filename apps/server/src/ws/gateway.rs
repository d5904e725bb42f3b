//! Turns one client message into one server reply.
//!
//! Kept apart from the actor so the whole intent surface can be exercised
//! without a socket.

use tracing::{debug, warn};

use crate::domain::{Player, PlayerId};
use crate::errors::DomainError;
use crate::services::{DequeueOutcome, EnqueueOutcome, HandoffPoll};
use crate::state::app_state::AppState;
use crate::ws::protocol::{ClientMsg, ErrorCode, ServerMsg, PROTOCOL_VERSION};

/// Reply to send, plus the identity the session holds from now on when the
/// message authenticated someone.
#[derive(Debug)]
pub struct Reply {
    pub msg: ServerMsg,
    pub identity: Option<Player>,
}

impl Reply {
    fn msg(msg: ServerMsg) -> Self {
        Self {
            msg,
            identity: None,
        }
    }
}

impl From<DomainError> for Reply {
    fn from(err: DomainError) -> Self {
        if err.is_infra() {
            warn!(error = %err, "request failed");
        }
        Reply::msg(ServerMsg::error(ErrorCode::from(&err), err.to_string()))
    }
}

fn not_logged_in() -> Reply {
    Reply::msg(ServerMsg::error(
        ErrorCode::NotLoggedIn,
        "authenticate before sending this request",
    ))
}

pub async fn dispatch(state: &AppState, player: Option<&Player>, msg: ClientMsg) -> Reply {
    match handle(state, player, msg).await {
        Ok(reply) => reply,
        Err(err) => err.into(),
    }
}

async fn handle(
    state: &AppState,
    player: Option<&Player>,
    msg: ClientMsg,
) -> Result<Reply, DomainError> {
    let coordinator = &state.coordinator;

    // intents that do not need an identity
    match msg {
        ClientMsg::Hello { .. } => {
            return Ok(Reply::msg(ServerMsg::HelloAck {
                protocol: PROTOCOL_VERSION,
            }))
        }
        ClientMsg::Register {
            name,
            password,
            password_confirm,
        } => {
            let player = state
                .auth
                .register(&name, &password, &password_confirm)
                .await?;
            return Ok(Reply {
                msg: ServerMsg::Registered {
                    player_id: player.id,
                    token: player.token.clone(),
                },
                identity: Some(player),
            });
        }
        ClientMsg::Login { name, password } => {
            let player = state.auth.login(&name, &password).await?;
            return Ok(logged_in(player));
        }
        ClientMsg::Authenticate { token } => {
            let player = state.auth.authenticate(&token).await?;
            return Ok(logged_in(player));
        }
        ClientMsg::ActiveCount => {
            return Ok(Reply::msg(ServerMsg::ActiveCount {
                count: coordinator.active_count().await?,
            }))
        }
        ClientMsg::GameState { guid } => {
            return Ok(Reply::msg(ServerMsg::GameState {
                game: coordinator.query_state(guid).await?,
            }))
        }
        _ => {}
    }

    let Some(player) = player else {
        return Ok(not_logged_in());
    };
    let me: PlayerId = player.id;
    debug!(player_id = %me, ?msg, "intent");

    let reply = match msg {
        ClientMsg::QueueUp => match coordinator.enqueue(me).await {
            EnqueueOutcome::Queued => ServerMsg::Queued,
            EnqueueOutcome::AlreadyQueued => ServerMsg::AlreadyQueued,
            EnqueueOutcome::Paired(guid) => ServerMsg::NewGame { guid },
        },
        ClientMsg::Dequeue => match coordinator.dequeue(me).await {
            DequeueOutcome::Dequeued => ServerMsg::Dequeued,
            DequeueOutcome::NotQueued => ServerMsg::NotQueued,
        },
        ClientMsg::PollHandoff => match coordinator.poll_handoff(me).await {
            HandoffPoll::Ready(guid) => ServerMsg::NewGame { guid },
            HandoffPoll::Waiting => ServerMsg::Waiting,
            HandoffPoll::NotQueued => ServerMsg::NotQueued,
        },
        ClientMsg::DirectPair { opponent_id } => ServerMsg::NewGame {
            guid: coordinator.direct_pair(me, opponent_id).await?,
        },
        ClientMsg::Move { guid, uci } => {
            coordinator.apply_move(guid, me, &uci).await?;
            ServerMsg::MoveMade { guid }
        }
        ClientMsg::CurrentGames => ServerMsg::CurrentGames {
            guids: coordinator.current_games(me).await?,
        },
        ClientMsg::MyTurn { guid } => ServerMsg::MyTurn {
            guid,
            value: coordinator.seat_view(guid, me).await?.my_turn,
        },
        ClientMsg::MySide { guid } => ServerMsg::MySide {
            guid,
            side: coordinator.seat_view(guid, me).await?.my_side,
        },
        ClientMsg::OpponentName { guid } => ServerMsg::OpponentName {
            guid,
            name: coordinator.seat_view(guid, me).await?.opponent.name,
        },
        // answered above
        ClientMsg::Hello { .. }
        | ClientMsg::Register { .. }
        | ClientMsg::Login { .. }
        | ClientMsg::Authenticate { .. }
        | ClientMsg::ActiveCount
        | ClientMsg::GameState { .. } => {
            return Err(DomainError::validation("unexpected message"))
        }
    };
    Ok(Reply::msg(reply))
}

fn logged_in(player: Player) -> Reply {
    Reply {
        msg: ServerMsg::LoggedIn {
            player_id: player.id,
            token: player.token.clone(),
        },
        identity: Some(player),
    }
}
