//! Catch-all routes for versions a kind no longer serves.

use std::sync::Arc;

use axum::{extract::State, routing::any, Router};

use super::api_version::{ApiVersion, EntityKind};
use crate::shared::error::ApiError;

/// Deepest number of extra path segments answered under a retired prefix.
pub const MAX_LEGACY_ARITY: usize = 4;

pub fn not_supported_message(version: ApiVersion, documentation_url: &str) -> String {
    format!(
        "Version {} is not supported anymore. See {} for the supported versions.",
        version, documentation_url
    )
}

async fn not_supported(State(message): State<Arc<str>>) -> ApiError {
    ApiError::VersionNotSupported(message.to_string())
}

/// Paths `prefix`, `prefix/{p1}` … `prefix/{p1}/…/{p4}`.
pub fn legacy_paths(prefix: &str) -> Vec<String> {
    let mut paths = Vec::with_capacity(MAX_LEGACY_ARITY + 1);
    let mut path = prefix.to_string();
    paths.push(path.clone());
    for segment in 1..=MAX_LEGACY_ARITY {
        path.push_str(&format!("/{{p{}}}", segment));
        paths.push(path.clone());
    }
    paths
}

/// Answers every verb under `/api/v{N}/{Kind}` with the fixed rejection.
pub fn legacy_router(kind: EntityKind, version: ApiVersion, documentation_url: &str) -> Router {
    let message: Arc<str> = Arc::from(not_supported_message(version, documentation_url));

    legacy_paths(&kind.prefix(version))
        .into_iter()
        .fold(Router::new(), |router, path| router.route(&path, any(not_supported)))
        .with_state(message)
}
