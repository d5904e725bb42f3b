use actix_web::web;

pub mod health;
pub mod realtime;
pub mod stats;

/// Register every route. Used by `main.rs` and by the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    cfg.configure(health::configure_routes);

    // Counters: /api/stats
    cfg.service(web::scope("/api").configure(stats::configure_routes));

    // Session gateway: /ws
    cfg.configure(realtime::configure_routes);
}
