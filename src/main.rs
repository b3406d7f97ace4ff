use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;

mod api;
mod auth;
mod config;
mod docs;
mod engine;
mod error;
mod model;
mod routes;
mod store;
mod utils;

use config::Config;

use crate::auth::otp::OtpService;
use crate::store::{Store, bootstrap, persist};
use crate::utils::assistant::Assistant;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use crate::docs::ApiDoc;

#[get("/")]
async fn index() -> impl Responder {
    "Payroll & Workforce Compliance Engine"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let store = Data::new(Store::from_tenants(persist::load(&config.data_file)));
    if bootstrap::seed_demo_tenant(&store) {
        info!("Demo tenant seeded on first load");
    }

    let otp = Data::new(OtpService::new(config.otp_ttl_secs));
    let assistant = Data::new(Assistant::unconfigured());

    // Debounced store flush; mutations only mark the store dirty.
    let store_for_flush = store.clone();
    let data_file = config.data_file.clone();
    let flush_interval_ms = config.flush_interval_ms;
    actix_web::rt::spawn(async move {
        persist::run_flush_loop(store_for_flush, data_file, flush_interval_ms).await;
    });

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(store.clone())
            .app_data(otp.clone())
            .app_data(assistant.clone())
            .app_data(Data::new(config.clone()))
            .service(index)
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await
}
