use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

/// Mensagem exibida ao usuário quando a identidade não pôde ser removida
pub const CONTACT_SUPPORT_MESSAGE: &str = "Failed to delete account. Please contact support.";

/// Errors of a single record collection in the external store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(e: mongodb::error::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

/// Errors raised by the authentication provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity {0} not found")]
    NotFound(String),

    #[error("auth provider rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("auth provider unreachable: {0}")]
    Transport(String),

    #[error("database error: {0}")]
    Database(String),
}

impl From<mongodb::error::Error> for IdentityError {
    fn from(e: mongodb::error::Error) -> Self {
        IdentityError::Database(e.to_string())
    }
}

impl From<reqwest::Error> for IdentityError {
    fn from(e: reqwest::Error) -> Self {
        IdentityError::Transport(e.to_string())
    }
}

/// Errors surfaced to callers of the account lifecycle endpoints.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("not authenticated")]
    Unauthenticated,

    /// Identity deletion failed after the per-collection purge already ran.
    #[error("identity deletion failed: {0}")]
    IdentityDeletion(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AccountError {
    /// Message safe to show to the end user.
    pub fn public_message(&self) -> &'static str {
        match self {
            AccountError::Unauthenticated => "Not authenticated",
            AccountError::IdentityDeletion(_) => CONTACT_SUPPORT_MESSAGE,
            AccountError::Internal(_) => "Internal server error",
        }
    }
}

impl ResponseError for AccountError {
    fn status_code(&self) -> StatusCode {
        match self {
            AccountError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AccountError::IdentityDeletion(_) | AccountError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "status": "error",
            "message": self.public_message()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_deletion_maps_to_support_message() {
        let err = AccountError::IdentityDeletion("boom".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), CONTACT_SUPPORT_MESSAGE);
    }

    #[test]
    fn test_unauthenticated_is_401() {
        assert_eq!(AccountError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_internal_hides_details() {
        let err = AccountError::Internal("connection reset by peer".to_string());
        assert_eq!(err.public_message(), "Internal server error");
    }
}
