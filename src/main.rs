#[macro_use]
extern crate log;
extern crate pretty_env_logger;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use dotenvy::dotenv;
use tiffin_xs::api::{self, ApiDoc};
use tiffin_xs::auth::SessionLayer;
use tiffin_xs::config::AppConfig;
use tiffin_xs::AppState;
use utoipa::OpenApi;
use utoipa_actix_web::AppExt;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = dotenv() {
        eprintln!("Failed to load .env file: {}", e);
    }

    // Setup logging
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    pretty_env_logger::init();

    let config = AppConfig::from_env();
    let (host, port) = (config.host.clone(), config.port);

    info!("Initializing database connection pool...");
    let state = AppState::new(config);

    info!("Starting server at http://{}:{}", host, port);

    HttpServer::new(move || {
        let (app, openapi) = App::new()
            .into_utoipa_app()
            .openapi(ApiDoc::openapi())
            .map(|app| {
                app.app_data(api::json_config())
                    .app_data(api::query_config())
                    .app_data(api::path_config())
                    .wrap(SessionLayer::new(state.sessions.clone()))
                    .wrap(Logger::default())
            })
            .configure(|cfg| api::configure(cfg, &state))
            .split_for_parts();

        app.app_data(web::Data::new(openapi))
            .route("/api-docs/openapi.json", web::get().to(api::openapi_json))
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
