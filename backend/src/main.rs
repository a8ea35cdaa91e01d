mod config;
mod db;
mod documents;
mod error;
mod payments;
mod services;
#[cfg(test)]
mod testing;

use crate::config::Config;
use crate::db::Database;
use crate::documents::DocumentRenderer;
use crate::payments::state::{start_payment_updater, PaymentsState};
use crate::payments::PaymentGateway;
use actix_web::{middleware, web, App, HttpRequest, HttpResponse, HttpServer};
use env_logger::Env;
use include_dir::{include_dir, Dir};
use log::{error, info};
use mime_guess::from_path;
use std::io;
use std::thread;
use std::time::Duration;

static STATIC_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/static/dist");

/// Serves the embedded frontend build; unknown paths fall back to
/// `index.html` so the single-page app handles them.
async fn serve_embedded(req: HttpRequest) -> HttpResponse {
    let path = req.path().trim_start_matches('/');
    let file_path = if path.is_empty() { "index.html" } else { path };

    match STATIC_DIR.get_file(file_path) {
        Some(file) => {
            let mime = from_path(file_path).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(mime.as_ref())
                .body(file.contents().to_vec())
        }
        None => match STATIC_DIR.get_file("index.html") {
            Some(index) => HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(index.contents().to_vec()),
            None => HttpResponse::NotFound().body("Frontend no compilado"),
        },
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::load().map_err(|e| {
        error!("Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;
    let url = config.url();

    let database = Database::new(&config.database_path);
    database.migrate().map_err(|e| {
        error!("Could not prepare {}: {}", database.path().display(), e);
        io::Error::other(e.to_string())
    })?;
    info!("Database ready at {}", database.path().display());

    if config.open_browser {
        let url_clone = url.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(500));
            let _ = webbrowser::open(&url_clone);
        });
    }

    let (payments, rx) = PaymentsState::new();
    let updater_state = payments.clone();
    tokio::spawn(async move {
        start_payment_updater(updater_state, rx).await;
    });

    let gateway = PaymentGateway::new(config.payment_gateway_url.clone());
    let renderer = DocumentRenderer::new(config.fonts_dir.clone());

    info!("Server running at {}", url);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(web::JsonConfig::default().limit(1024 * 1024))
            .app_data(web::Data::new(database.clone()))
            .app_data(web::Data::new(payments.clone()))
            .app_data(web::Data::new(gateway.clone()))
            .app_data(web::Data::new(renderer.clone()))
            .configure(services::configure)
            .default_service(web::route().to(serve_embedded))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
