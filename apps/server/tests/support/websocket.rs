// WebSocket test server

use std::net::TcpListener;
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::{web, App, HttpServer};
use chess_server::routes;
use chess_server::state::app_state::AppState;
use serde_json::json;

use super::websocket_client::WebSocketClient;

/// Start a real HTTP server on a random local port.
///
/// Returns the handle used to stop it and the `ws://` URL of the gateway.
pub async fn start_test_server(
    state: AppState,
) -> Result<(ServerHandle, String), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let data = web::Data::new(state);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .workers(1)
    .listen(listener)?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);
    Ok((handle, format!("ws://{addr}/ws")))
}

/// Connect and complete the hello exchange.
pub async fn connect_with_hello(url: &str) -> Result<WebSocketClient, Box<dyn std::error::Error>> {
    let mut client = WebSocketClient::connect_retry(url, Duration::from_secs(2)).await?;
    let ack = client.request(json!({"type": "hello", "protocol": 1})).await?;
    assert_eq!(ack["type"], "hello_ack");
    Ok(client)
}

/// Connect, say hello and register a fresh player. Returns the client and
/// the player id.
pub async fn connect_registered(
    url: &str,
    name: &str,
) -> Result<(WebSocketClient, i64), Box<dyn std::error::Error>> {
    let mut client = connect_with_hello(url).await?;
    let reply = client
        .request(json!({
            "type": "register",
            "name": name,
            "password": "secret",
            "password_confirm": "secret",
        }))
        .await?;
    assert_eq!(reply["type"], "registered", "register failed: {reply}");
    let id = reply["player_id"].as_i64().ok_or("missing player_id")?;
    Ok((client, id))
}
