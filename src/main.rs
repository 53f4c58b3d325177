mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use services::{
    AccountLifecycleManager, AdminApiIdentityProvider, CollectionRegistry, IdentityProvider,
    LogEvents, MongoIdentityProvider, MongoRecordStore,
};
use std::io;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn startup_error(msg: String) -> io::Error {
    log::error!("❌ {}", msg);
    io::Error::new(io::ErrorKind::Other, msg)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = config::AppConfig::from_env()
        .map_err(|e| startup_error(format!("Invalid configuration: {}", e)))?;

    log::info!("🚀 Starting Marketing Service...");

    let mut registry = CollectionRegistry::with_defaults();
    if let Some(names) = &config.purge_collections {
        registry = registry.with_purge_set(names);
    }
    if let Some(names) = &config.export_collections {
        registry = registry.with_export_set(names);
    }
    // Initialize MongoDB connection
    let db = database::MongoDB::new(&config.database_url, registry.all())
        .await
        .map_err(|e| startup_error(format!("Failed to connect to MongoDB: {}", e)))?;

    log::info!("✅ MongoDB connected successfully");

    let identities: Arc<dyn IdentityProvider> = match &config.auth_admin {
        Some(settings) => {
            log::info!("🔑 Auth identities managed through admin API at {}", settings.base_url);
            Arc::new(
                AdminApiIdentityProvider::new(settings.clone())
                    .map_err(|e| startup_error(format!("Failed to build auth admin client: {}", e)))?,
            )
        }
        None => {
            log::info!("🔑 Auth identities managed in the users collection");
            Arc::new(MongoIdentityProvider::new(db.clone()))
        }
    };

    let manager = web::Data::new(AccountLifecycleManager::new(
        Arc::new(MongoRecordStore::new(db.clone())),
        identities,
        Arc::new(LogEvents),
        registry,
    ));
    log::info!(
        "🗂️  User collections: {} purged on deletion, {} exported",
        manager.registry().purge_targets().len(),
        manager.registry().export_targets().len()
    );
    let db_data = web::Data::new(db);

    let bind_addr = (config.host.clone(), config.port);
    log::info!("🌐 Server starting on {}:{}", config.host, config.port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", config.host, config.port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = config
            .cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .supports_credentials()
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .app_data(manager.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi)
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Account lifecycle - Requires JWT
            .service(
                web::scope("/api/v1/user")
                    .wrap(middleware::AuthMiddleware::new(config.jwt.clone()))
                    .route("/account", web::delete().to(api::account::delete_account))
                    .route("/export", web::get().to(api::account::export_data))
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
