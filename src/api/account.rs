use actix_web::{web, HttpResponse};
use crate::{
    models::{AuthenticatedUser, DeleteAccountResponse, ExportBundle},
    services::AccountLifecycleManager,
    utils::AccountError,
};

/// DELETE /api/v1/user/account - Remove a conta e todos os dados do usuário
///
/// Irreversível. Collections que falharem são ignoradas (log); falha ao remover
/// a identidade retorna 500 pedindo contato com o suporte.
#[utoipa::path(
    delete,
    path = "/api/v1/user/account",
    tag = "Account",
    responses(
        (status = 200, description = "Account and data deleted", body = DeleteAccountResponse),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Identity could not be deleted, contact support")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_account(
    user: Option<web::ReqData<AuthenticatedUser>>,
    manager: web::Data<AccountLifecycleManager>,
) -> Result<HttpResponse, AccountError> {
    let caller = user.map(|u| u.into_inner());
    log::info!(
        "🗑️ DELETE /user/account - user: {}",
        caller.as_ref().map(|u| u.id.as_str()).unwrap_or("anonymous")
    );

    match manager.delete_account(caller.as_ref()).await {
        Ok(response) => {
            log::info!("✅ Account deleted successfully: {}", response.user_id);
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            log::error!("❌ Failed to delete account: {}", e);
            Err(e)
        }
    }
}

/// GET /api/v1/user/export - Exporta todos os dados do usuário (somente leitura)
#[utoipa::path(
    get,
    path = "/api/v1/user/export",
    tag = "Account",
    responses(
        (status = 200, description = "Data export", body = ExportBundle),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Unexpected failure")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn export_data(
    user: Option<web::ReqData<AuthenticatedUser>>,
    manager: web::Data<AccountLifecycleManager>,
) -> Result<HttpResponse, AccountError> {
    let caller = user.map(|u| u.into_inner());
    log::info!(
        "📦 GET /user/export - user: {}",
        caller.as_ref().map(|u| u.id.as_str()).unwrap_or("anonymous")
    );

    let bundle = manager.export_data(caller.as_ref()).await?;

    log::info!("✅ Export built: {} collections", bundle.data.len());
    Ok(HttpResponse::Ok().json(bundle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::AuthMiddleware;
    use crate::services::auth_service::test_tokens::{settings, token_for};
    use crate::services::testing::{InMemoryIdentityProvider, InMemoryRecordStore, RecordingEvents};
    use crate::services::collections::{CollectionRegistry, UserCollection};
    use crate::utils::CONTACT_SUPPORT_MESSAGE;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::json;
    use std::sync::Arc;

    fn manager(store: InMemoryRecordStore, identities: InMemoryIdentityProvider) -> web::Data<AccountLifecycleManager> {
        let registry = CollectionRegistry::new(vec![
            UserCollection { name: "prefs".to_string(), purge: true, export: true },
            UserCollection { name: "campaigns".to_string(), purge: true, export: true },
        ]);
        web::Data::new(AccountLifecycleManager::new(
            Arc::new(store),
            Arc::new(identities),
            Arc::new(RecordingEvents::default()),
            registry,
        ))
    }

    macro_rules! app {
        ($manager:expr) => {
            test::init_service(
                App::new().app_data($manager).service(
                    web::scope("/api/v1/user")
                        .wrap(AuthMiddleware::new(settings()))
                        .route("/account", web::delete().to(delete_account))
                        .route("/export", web::get().to(export_data)),
                ),
            )
            .await
        };
    }

    fn bearer(sub: &str) -> (&'static str, String) {
        (
            "Authorization",
            format!("Bearer {}", token_for(sub, &format!("{}@example.com", sub), "test-secret", "authenticated")),
        )
    }

    #[actix_web::test]
    async fn test_delete_success_despite_collection_failure() {
        let app = app!(manager(
            InMemoryRecordStore::new().failing_on("prefs"),
            InMemoryIdentityProvider::new().with_user("u1", "u1@example.com"),
        ));

        let req = test::TestRequest::delete()
            .uri("/api/v1/user/account")
            .insert_header(bearer("u1"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["user_id"], "u1");
    }

    #[actix_web::test]
    async fn test_delete_identity_failure_returns_support_message() {
        let app = app!(manager(
            InMemoryRecordStore::new(),
            InMemoryIdentityProvider::new()
                .with_user("u1", "u1@example.com")
                .failing_deletes(),
        ));

        let req = test::TestRequest::delete()
            .uri("/api/v1/user/account")
            .insert_header(bearer("u1"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], CONTACT_SUPPORT_MESSAGE);
    }

    #[actix_web::test]
    async fn test_missing_token_is_401() {
        let app = app!(manager(
            InMemoryRecordStore::new(),
            InMemoryIdentityProvider::new().with_user("u1", "u1@example.com"),
        ));

        for req in [
            test::TestRequest::delete().uri("/api/v1/user/account").to_request(),
            test::TestRequest::get().uri("/api/v1/user/export").to_request(),
        ] {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[actix_web::test]
    async fn test_invalid_token_is_401() {
        let app = app!(manager(
            InMemoryRecordStore::new(),
            InMemoryIdentityProvider::new().with_user("u1", "u1@example.com"),
        ));

        let forged = token_for("u1", "u1@example.com", "not-the-secret", "authenticated");
        let req = test::TestRequest::get()
            .uri("/api/v1/user/export")
            .insert_header(("Authorization", format!("Bearer {}", forged)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_lowercase_bearer_scheme_is_accepted() {
        let app = app!(manager(
            InMemoryRecordStore::new(),
            InMemoryIdentityProvider::new().with_user("u1", "u1@example.com"),
        ));

        let token = token_for("u1", "u1@example.com", "test-secret", "authenticated");
        let req = test::TestRequest::get()
            .uri("/api/v1/user/export")
            .insert_header(("Authorization", format!("bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_token_without_subject_is_401() {
        let app = app!(manager(
            InMemoryRecordStore::new(),
            InMemoryIdentityProvider::new().with_user("u1", "u1@example.com"),
        ));

        let req = test::TestRequest::delete()
            .uri("/api/v1/user/account")
            .insert_header(bearer(""))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "error");
    }

    #[actix_web::test]
    async fn test_export_lists_every_collection() {
        let app = app!(manager(
            InMemoryRecordStore::new().with_row("campaigns", json!({"user_id": "u1", "title": "launch"})),
            InMemoryIdentityProvider::new().with_user("u1", "u1@example.com"),
        ));

        let req = test::TestRequest::get()
            .uri("/api/v1/user/export")
            .insert_header(bearer("u1"))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["user_id"], "u1");
        assert_eq!(body["email"], "u1@example.com");
        assert!(body["export_date"].is_string());
        assert_eq!(body["data"]["campaigns"][0]["title"], "launch");
        assert_eq!(body["data"]["prefs"], json!([]));
    }
}
