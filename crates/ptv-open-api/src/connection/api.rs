//! Connection API
//!
//! `/api/v{N}/Connection` endpoints.

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use bytes::Bytes;
use uuid::Uuid;

use super::dto::{ChannelConnectionsResponse, ConnectionResponse, ServiceConnectionsResponse};
use super::manager::{BulkConnectionManager, ChannelConnectionManager, ServiceConnectionManager};
use crate::domain::{Connection, DomainServices, Service};
use crate::manager as managers;
use crate::shared::api_common::{not_found_message, path_id};
use crate::shared::error::{ApiError, Result};
use crate::shared::middleware::{guarded, Authenticated};
use crate::shared::state::VersionedState;

/// Connections of a service whose channel is visible to anonymous readers.
pub async fn visible_channel_connections(services: &DomainServices, service_id: Uuid) -> Result<Vec<Connection>> {
    let mut visible = Vec::new();
    for connection in services.connections.for_service(service_id).await? {
        let channel = services.channels.get(connection.service_channel_id).await?;
        if channel.is_some_and(|c| c.publishing_status.is_visible()) {
            visible.push(connection);
        }
    }
    Ok(visible)
}

/// Connections of a channel whose service is visible to anonymous readers.
pub async fn visible_service_connections(services: &DomainServices, channel_id: Uuid) -> Result<Vec<Connection>> {
    let mut visible = Vec::new();
    for connection in services.connections.for_channel(channel_id).await? {
        let service = services.services.get(connection.service_id).await?;
        if service.is_some_and(|s| s.publishing_status.is_visible()) {
            visible.push(connection);
        }
    }
    Ok(visible)
}

/// Channels connected to a visible service.
pub async fn get_service_connections(
    State(state): State<VersionedState>,
    Path(service_id): Path<String>,
) -> Result<Json<ServiceConnectionsResponse>> {
    let id = path_id(&service_id, "serviceId")?;
    let services = state.services();
    services
        .services
        .get(id)
        .await?
        .filter(|s| s.publishing_status.is_visible())
        .ok_or_else(|| ApiError::not_found(not_found_message::<Service>(id)))?;

    let connections = visible_channel_connections(services, id).await?;
    Ok(Json(ServiceConnectionsResponse {
        service_id: id,
        service_channels: ConnectionResponse::project_all(&connections, state.shape()),
    }))
}

pub async fn save_service_connections(
    State(state): State<VersionedState>,
    auth: Authenticated,
    Path(service_id): Path<String>,
    body: Bytes,
) -> Result<Json<ServiceConnectionsResponse>> {
    let id = path_id(&service_id, "serviceId")?;
    let manager = ServiceConnectionManager::new(&state, &auth, id);
    Ok(Json(managers::run(&manager, &body).await?))
}

pub async fn save_channel_connections(
    State(state): State<VersionedState>,
    auth: Authenticated,
    Path(channel_id): Path<String>,
    body: Bytes,
) -> Result<Json<ChannelConnectionsResponse>> {
    let id = path_id(&channel_id, "serviceChannelId")?;
    let manager = ChannelConnectionManager::new(&state, &auth, id);
    Ok(Json(managers::run(&manager, &body).await?))
}

pub async fn add_connections(
    State(state): State<VersionedState>,
    auth: Authenticated,
    body: Bytes,
) -> Result<Json<Vec<ConnectionResponse>>> {
    let manager = BulkConnectionManager::new(&state, &auth);
    Ok(Json(managers::run(&manager, &body).await?))
}

pub fn connection_router(prefix: &str, state: VersionedState) -> Router {
    let read = state.read_gate();
    let write = state.write_gate();

    Router::new()
        .route(prefix, guarded(post(add_connections), write.clone()))
        .route(
            &format!("{}/serviceId/{{service_id}}", prefix),
            guarded(get(get_service_connections), read)
                .merge(guarded(put(save_service_connections), write.clone())),
        )
        .route(
            &format!("{}/serviceChannelId/{{channel_id}}", prefix),
            guarded(put(save_channel_connections), write),
        )
        .with_state(state)
}
