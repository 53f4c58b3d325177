use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
pub struct DeleteAccountResponse {
    pub status: String,
    pub message: String,
    pub user_id: String,
}

impl DeleteAccountResponse {
    pub fn success(user_id: &str) -> Self {
        Self {
            status: "success".to_string(),
            message: "Account and all associated data have been permanently deleted".to_string(),
            user_id: user_id.to_string(),
        }
    }
}

/// Snapshot of everything stored for one user. Built per request, never persisted.
#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
pub struct ExportBundle {
    pub user_id: String,
    pub email: Option<String>,
    /// RFC 3339 timestamp of when the export was assembled
    pub export_date: String,
    /// One entry per exported collection, empty when nothing was found or the read failed
    #[schema(value_type = Object)]
    pub data: BTreeMap<String, Vec<serde_json::Value>>,
}
