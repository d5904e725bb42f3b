use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::error::AppError;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
struct StatsResponse {
    active_games: usize,
    queued_players: usize,
}

async fn stats(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let coordinator = &app_state.coordinator;
    let response = StatsResponse {
        active_games: coordinator.active_count().await?,
        queued_players: coordinator.queued_count().await,
    };
    Ok(HttpResponse::Ok().json(response))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/stats", web::get().to(stats));
}
