use actix_web::{web, App, HttpServer};
use chess_server::config::db::DbProfile;
use chess_server::config::server::ServerConfig;
use chess_server::infra::state::build_state;
use chess_server::routes;
use chess_server::services::PairingScheduler;
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid server configuration: {e}");
            std::process::exit(1);
        }
    };
    let profile = match DbProfile::from_env() {
        Ok(profile) => profile,
        Err(e) => {
            eprintln!("❌ Invalid database configuration: {e}");
            std::process::exit(1);
        }
    };

    let app_state = match build_state().with_db(profile).build().await {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    // Games left in progress by a previous run are playable again.
    if let Err(e) = app_state.coordinator.load_active_from_store().await {
        error!(error = %e, "failed to load active games");
        std::process::exit(1);
    }

    let scheduler = PairingScheduler::start(app_state.coordinator.clone(), config.scheduler);

    info!(host = %config.host, port = config.port, "starting chess server");

    // Wrap AppState with web::Data before passing to HttpServer
    let data = web::Data::new(app_state);

    let result = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await;

    scheduler.stop().await;
    result
}
