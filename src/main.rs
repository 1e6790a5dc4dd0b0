use std::sync::Arc;

use actix_web::{App, HttpServer};
use bura_server::config::ServerConfig;
use bura_server::hub::{spawn_reaper, Hub};
use bura_server::middleware::cors::cors_middleware;
use bura_server::persistence::LoggingMatchEndSink;
use bura_server::registry::RoomRegistry;
use bura_server::routes;
use bura_server::telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let config = ServerConfig::from_env().unwrap_or_else(|err| {
        eprintln!("configuration error: {err}");
        std::process::exit(1);
    });

    tracing::info!(bind_addr = %config.bind_addr, "starting bura-server");

    let registry = Arc::new(RoomRegistry::new());
    let hub = Arc::new(Hub::new(registry, Arc::new(LoggingMatchEndSink), config.disconnect_grace_secs));
    spawn_reaper(hub.clone(), config.reaper_interval_secs);

    let bind_addr = config.bind_addr.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .app_data(actix_web::web::Data::new(hub.clone()))
            .configure(routes::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await
}
