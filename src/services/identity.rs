// ==================== AUTH IDENTITY ====================
// Identidades pertencem ao provedor de autenticação. Este serviço só
// consulta e remove; nunca cria.

use crate::{
    config::AuthAdminSettings,
    database::MongoDB,
    models::Identity,
    utils::IdentityError,
};
use mongodb::bson::{doc, Document};
use serde::Deserialize;

/// Administrative access to the authentication provider.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Looks up an identity. `Ok(None)` when it does not exist (e.g. already deleted).
    async fn get_user(&self, user_id: &str) -> Result<Option<Identity>, IdentityError>;

    /// Permanently removes the identity.
    async fn delete_user(&self, user_id: &str) -> Result<(), IdentityError>;
}

/// Identities stored in the `users` collection, keyed by `user_id`
#[derive(Clone)]
pub struct MongoIdentityProvider {
    db: MongoDB,
}

impl MongoIdentityProvider {
    pub fn new(db: MongoDB) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl IdentityProvider for MongoIdentityProvider {
    async fn get_user(&self, user_id: &str) -> Result<Option<Identity>, IdentityError> {
        let user = self
            .db
            .collection::<Document>("users")
            .find_one(doc! { "user_id": user_id })
            .await?;

        Ok(user.map(|doc| Identity {
            user_id: user_id.to_string(),
            email: doc.get_str("email").ok().map(str::to_string),
        }))
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), IdentityError> {
        let result = self
            .db
            .collection::<Document>("users")
            .delete_one(doc! { "user_id": user_id })
            .await?;

        if result.deleted_count == 0 {
            return Err(IdentityError::NotFound(user_id.to_string()));
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct AdminUser {
    id: String,
    email: Option<String>,
}

/// Hosted auth provider reached through its admin REST API with a service key.
pub struct AdminApiIdentityProvider {
    http: reqwest::Client,
    settings: AuthAdminSettings,
}

impl AdminApiIdentityProvider {
    pub fn new(settings: AuthAdminSettings) -> Result<Self, IdentityError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;

        Ok(Self { http, settings })
    }

    fn user_url(&self, user_id: &str) -> String {
        format!(
            "{}/admin/users/{}",
            self.settings.base_url,
            urlencoding::encode(user_id)
        )
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.settings.service_key)
            .bearer_auth(&self.settings.service_key)
    }
}

/// How the admin API answered a per-user request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdminStatus {
    Ok,
    Missing,
    Failed,
}

fn admin_status(status: reqwest::StatusCode) -> AdminStatus {
    match status {
        s if s.is_success() => AdminStatus::Ok,
        reqwest::StatusCode::NOT_FOUND => AdminStatus::Missing,
        _ => AdminStatus::Failed,
    }
}

async fn rejected(response: reqwest::Response) -> IdentityError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    IdentityError::Rejected { status, body }
}

#[async_trait::async_trait]
impl IdentityProvider for AdminApiIdentityProvider {
    async fn get_user(&self, user_id: &str) -> Result<Option<Identity>, IdentityError> {
        let response = self
            .authorized(self.http.get(self.user_url(user_id)))
            .send()
            .await?;

        match admin_status(response.status()) {
            AdminStatus::Ok => {}
            AdminStatus::Missing => return Ok(None),
            AdminStatus::Failed => return Err(rejected(response).await),
        }

        let user: AdminUser = response.json().await?;

        Ok(Some(Identity {
            user_id: user.id,
            email: user.email,
        }))
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), IdentityError> {
        log::debug!("🔑 DELETE {}", self.user_url(user_id));

        let response = self
            .authorized(self.http.delete(self.user_url(user_id)))
            .send()
            .await?;

        match admin_status(response.status()) {
            AdminStatus::Ok => Ok(()),
            AdminStatus::Missing => Err(IdentityError::NotFound(user_id.to_string())),
            AdminStatus::Failed => Err(rejected(response).await),
        }
    }
}
