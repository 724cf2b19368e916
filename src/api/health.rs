use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::api::response::ApiResponse;
use crate::config::AppConfig;
use crate::database::MongoDB;

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub database: String,
    pub timestamp: i64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct WelcomeResponse {
    pub message: String,
    pub version: String,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses(
        (status = 200, description = "Service banner", body = WelcomeResponse)
    )
)]
pub async fn welcome(config: web::Data<AppConfig>) -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::success(
        "Online OneToOne",
        WelcomeResponse {
            message: "Welcome to the Online OneToOne REST API".to_string(),
            version: config.app_version.clone(),
        },
    ))
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(config: web::Data<AppConfig>, db: Option<web::Data<MongoDB>>) -> impl Responder {
    let database = match db {
        Some(db) => match db.ping().await {
            Ok(()) => "up",
            Err(e) => {
                log::error!("❌ Health check: database ping failed: {}", e);
                "down"
            }
        },
        None => "not configured",
    };

    let body = HealthResponse {
        status: if database == "down" { "unhealthy" } else { "healthy" }.to_string(),
        service: "one-to-one-service".to_string(),
        version: config.app_version.clone(),
        database: database.to_string(),
        timestamp: chrono::Utc::now().timestamp(),
    };

    if database == "down" {
        HttpResponse::ServiceUnavailable().json(body)
    } else {
        HttpResponse::Ok().json(body)
    }
}
