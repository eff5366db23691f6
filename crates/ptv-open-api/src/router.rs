//! Application router.
//!
//! One router per (kind, version) pair of the dispatch table: supported
//! pairs get the kind's endpoints with the pair's contract, retired ones
//! get the legacy catch-all. Probes sit outside the version space.

use std::sync::Arc;

use axum::{http::Uri, Router};
use tracing::debug;

use crate::code_list::code_list_router;
use crate::common::common_router;
use crate::connection::connection_router;
use crate::general_description::general_description_router;
use crate::organization::organization_router;
use crate::service::service_router;
use crate::service_channel::service_channel_router;
use crate::service_collection::service_collection_router;
use crate::shared::error::ApiError;
use crate::shared::health_api::{health_router, HealthAggregator};
use crate::shared::state::{ApiState, VersionedState};
use crate::version::{legacy_router, ApiVersion, Dispatch, DispatchTable, EntityKind};

fn kind_router(kind: EntityKind, prefix: &str, state: VersionedState) -> Router {
    match kind {
        EntityKind::Organization => organization_router(prefix, state),
        EntityKind::Service => service_router(prefix, state),
        EntityKind::ServiceChannel => service_channel_router(prefix, state),
        EntityKind::ServiceCollection => service_collection_router(prefix, state),
        EntityKind::GeneralDescription => general_description_router(prefix, state),
        EntityKind::Connection => connection_router(prefix, state),
        EntityKind::CodeList => code_list_router(prefix, state),
        EntityKind::Common => common_router(prefix, state),
    }
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("Resource '{}' not found.", uri.path()))
}

/// Every versioned route plus `/Ping` and `/Pong`.
pub fn build_router(state: ApiState, health: HealthAggregator) -> Router {
    let table = DispatchTable::new();
    let mut router = Router::new();

    for kind in EntityKind::ALL {
        for version in ApiVersion::all() {
            let prefix = kind.prefix(version);
            router = match table.lookup(kind, version) {
                Dispatch::Supported(contract) => {
                    router.merge(kind_router(kind, &prefix, VersionedState::new(state.clone(), contract)))
                }
                Dispatch::NotSupported => router.merge(legacy_router(kind, version, &state.documentation_url)),
            };
        }
    }
    debug!(contracts = table.len(), "Versioned routes registered");

    router
        .merge(health_router(Arc::new(health)))
        .fallback(not_found)
}
