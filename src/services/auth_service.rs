use crate::{config::JwtSettings, models::AuthenticatedUser};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// JWT Claims issued by the hosted auth provider
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    #[serde(default)]
    pub sub: String,           // user_id
    pub email: Option<String>,
    pub role: Option<String>,
    pub exp: usize,            // expiration
    pub aud: Option<String>,   // audience
    pub iss: Option<String>,   // issuer
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        AuthenticatedUser {
            id: claims.sub,
            email: claims.email,
        }
    }
}

// Verify JWT token
pub fn verify_token(token: &str, settings: &JwtSettings) -> Result<Claims, String> {
    let mut validation = Validation::new(Algorithm::HS256);

    match &settings.audience {
        Some(audience) => validation.set_audience(&[audience]),
        None => validation.validate_aud = false,
    }

    if let Some(issuer) = &settings.issuer {
        let mut issuers = HashSet::new();
        issuers.insert(issuer.clone());
        validation.iss = Some(issuers);
    }

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.secret.as_ref()),
        &validation
    )
    .map(|data| data.claims)
    .map_err(|e| format!("Invalid token: {}", e))
}

/// Extracts the token from an `Authorization: Bearer <token>` header value
pub fn bearer_token(header: &str) -> Option<&str> {
    // scheme é case-insensitive (RFC 7235)
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.trim()).filter(|token| !token.is_empty())
}
