use serde::{Deserialize, Serialize};

/// Caller identity extracted from a verified bearer token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: Option<String>,
}

/// Identity as known by the authentication provider
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,  // PRIMARY IDENTIFIER - shared by every user-scoped collection
    pub email: Option<String>,
}
