use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing::info;
use tracing_actix_web::TracingLogger;

use ecommerce_backend::config::{ServerSettings, Settings};
use ecommerce_backend::db::Store;
use ecommerce_backend::{handlers, telemetry};

fn cors(server: &ServerSettings) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);
    if server.allowed_origins.is_empty() {
        return cors.allow_any_origin();
    }
    server
        .allowed_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    telemetry::init();

    let settings = Settings::load().map_err(io::Error::other)?;
    let store = Store::open(&settings.database).map_err(io::Error::other)?;
    let store = web::Data::new(store);
    let auth = web::Data::new(settings.auth.clone());
    let server = settings.server.clone();

    info!("Starting HTTP server on http://{}:{}", server.host, server.port);

    let app_store = store.clone();
    let cors_settings = server.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(cors(&cors_settings))
            .wrap(TracingLogger::default())
            .app_data(app_store.clone())
            .app_data(auth.clone())
            .configure(handlers::configure)
    })
    .bind((server.host.as_str(), server.port))?
    .run()
    .await?;

    if let Ok(store) = Arc::try_unwrap(store.into_inner()) {
        store.close();
    }
    Ok(())
}
