use crate::database::MongoDB;
use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    /// "connected" or "unreachable"; absent when no database is configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    pub timestamp: i64,
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
pub async fn health_check(db: Option<web::Data<MongoDB>>) -> impl Responder {
    let database_up = match &db {
        Some(db) => Some(db.ping().await),
        None => None,
    };

    let body = HealthResponse {
        status: (if database_up == Some(false) { "degraded" } else { "healthy" }).to_string(),
        service: "marketing-service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database_up.map(|up| (if up { "connected" } else { "unreachable" }).to_string()),
        timestamp: chrono::Utc::now().timestamp(),
    };

    if database_up == Some(false) {
        log::warn!("⚠️ Health check: database unreachable");
        HttpResponse::ServiceUnavailable().json(body)
    } else {
        HttpResponse::Ok().json(body)
    }
}
