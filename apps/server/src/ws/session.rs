use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::Player;
use crate::state::app_state::AppState;
use crate::ws::gateway;
use crate::ws::protocol::{ClientMsg, ErrorCode, ServerMsg, PROTOCOL_VERSION};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let session = WsSession::new(Uuid::new_v4(), app_state);
    ws::start(session, &req, stream)
}

/// One client connection. Requests are answered strictly in arrival order:
/// each one blocks the mailbox until its reply has been written.
pub struct WsSession {
    conn_id: Uuid,
    app_state: web::Data<AppState>,
    player: Option<Player>,
    last_heartbeat: Instant,
    hello_done: bool,
}

impl WsSession {
    fn new(conn_id: Uuid, app_state: web::Data<AppState>) -> Self {
        Self {
            conn_id,
            app_state,
            player: None,
            last_heartbeat: Instant::now(),
            hello_done: false,
        }
    }

    fn player_id(&self) -> Option<i64> {
        self.player.as_ref().map(|p| p.id.0)
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    fn send_error_and_close(
        &self,
        ctx: &mut ws::WebsocketContext<Self>,
        code: ErrorCode,
        message: impl Into<String>,
    ) {
        Self::send_json(ctx, &ServerMsg::error(code, message));
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
        ctx.stop();
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(
                    conn_id = %actor.conn_id,
                    player_id = ?actor.player_id(),
                    "[WS SESSION] heartbeat timed out"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }

    fn handle_text(&mut self, text: &str, ctx: &mut ws::WebsocketContext<Self>) {
        let cmd = match serde_json::from_str::<ClientMsg>(text) {
            Ok(cmd) => cmd,
            Err(err) => {
                debug!(conn_id = %self.conn_id, error = %err, "[WS SESSION] malformed request");
                Self::send_json(
                    ctx,
                    &ServerMsg::error(ErrorCode::BadRequest, format!("malformed request: {err}")),
                );
                return;
            }
        };

        if let ClientMsg::Hello { protocol } = cmd {
            if protocol != PROTOCOL_VERSION {
                self.send_error_and_close(
                    ctx,
                    ErrorCode::BadProtocol,
                    "Unsupported protocol version",
                );
                return;
            }
            self.hello_done = true;
        } else if !self.hello_done {
            self.send_error_and_close(ctx, ErrorCode::BadRequest, "Must send hello first");
            return;
        }

        let app_state = self.app_state.clone();
        let player = self.player.clone();
        ctx.wait(
            async move { gateway::dispatch(&app_state, player.as_ref(), cmd).await }
                .into_actor(self)
                .map(|reply, actor, ctx| {
                    if let Some(player) = reply.identity {
                        info!(
                            conn_id = %actor.conn_id,
                            player_id = %player.id,
                            "[WS SESSION] authenticated"
                        );
                        actor.player = Some(player);
                    }
                    Self::send_json(ctx, &reply.msg);
                }),
        );
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(conn_id = %self.conn_id, "[WS SESSION] started");
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        info!(
            conn_id = %self.conn_id,
            player_id = ?self.player_id(),
            "[WS SESSION] stopped"
        );
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();
                self.handle_text(&text, ctx);
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                self.send_error_and_close(ctx, ErrorCode::BadRequest, "Binary not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(
                    conn_id = %self.conn_id,
                    error = %err,
                    "[WS SESSION] protocol error"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}
