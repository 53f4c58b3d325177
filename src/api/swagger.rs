use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Marketing Service API - Account Lifecycle",
        version = "1.0.0",
        description = "Account deletion and personal data export.\n\n**Authentication:** `/api/v1/user/*` endpoints require the JWT issued by the auth provider as a Bearer token.\n\n**Deletion** is irreversible: user-scoped collections are purged best-effort, then the auth identity is removed. If the identity cannot be removed the request fails with a contact-support message.\n\n**Export** returns one entry per exportable collection, empty when nothing is stored."
    ),
    paths(
        // Account lifecycle
        crate::api::account::delete_account,
        crate::api::account::export_data,

        // Health
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::models::DeleteAccountResponse,
            crate::models::ExportBundle,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Account", description = "Account deletion and data export for the authenticated user."),
        (name = "Health", description = "Health check for monitoring service status."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token issued by the auth provider"))
                        .build()
                ),
            );
        }
    }
}
