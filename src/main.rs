mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::{MongoDB, MongoReportStore, MongoUserStore, ReportStore, UserStore};
use crate::services::{ReportService, TokenService, UserService};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("❌ Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    log::info!("🚀 Starting OneToOne service ({})...", config.environment);
    log::info!("📊 Database: {} / {}", config.database_url, config.database_name);

    let db = MongoDB::connect(&config).await.map_err(|e| {
        log::error!("❌ Failed to connect to MongoDB: {}", e);
        std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string())
    })?;
    log::info!("✅ MongoDB connected successfully");

    // Composition root: stores and services are built once and shared by every worker
    let user_store: Arc<dyn UserStore> = Arc::new(MongoUserStore::new(&db));
    let report_store: Arc<dyn ReportStore> = Arc::new(MongoReportStore::new(&db));
    let tokens = TokenService::from_config(&config);

    let users = web::Data::new(UserService::new(user_store.clone(), tokens.clone()));
    let reports = web::Data::new(ReportService::new(user_store, report_store));
    let tokens = web::Data::new(tokens);
    let db_data = web::Data::new(db);
    let config_data = web::Data::new(config.clone());

    log::info!("🌐 Server starting on {}:{}", config.host, config.port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(db_data.clone())
            .app_data(config_data.clone())
            .app_data(users.clone())
            .app_data(reports.clone())
            .app_data(tokens.clone())
            .wrap(build_cors(&config_data))
            .wrap(middleware::SecurityHeaders)
            .wrap(Logger::default())
            .configure(api::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ORIGIN,
        ])
        .expose_headers(vec![header::CONTENT_LENGTH, header::AUTHORIZATION])
        .max_age(3600);

    if config.allows_any_origin() {
        // credentials cannot be combined with a wildcard origin
        cors = cors.allow_any_origin();
    } else {
        for origin in &config.cors_allow_origins {
            cors = cors.allowed_origin(origin);
        }
        cors = cors.supports_credentials();
    }

    cors
}
