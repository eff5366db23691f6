//! Service API
//!
//! `/api/v{N}/Service` endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use bytes::Bytes;

use super::dto::ServiceResponse;
use super::manager::ServiceManager;
use crate::connection::visible_channel_connections;
use crate::manager::{self as managers, WriteKey};
use crate::organization::OrganizationQuery;
use crate::shared::api_common::{get_visible, list_entities, path_id, ListItem, ListQuery, PagedResult};
use crate::shared::error::Result;
use crate::shared::middleware::{guarded, Authenticated};
use crate::shared::state::VersionedState;

pub async fn list_services(
    State(state): State<VersionedState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PagedResult<ListItem>>> {
    let params = query.into_params()?;
    let store = state.services().services.as_ref();
    Ok(Json(list_entities(store, params, state.page_size(), state.shape()).await?))
}

pub async fn get_service(
    State(state): State<VersionedState>,
    Path(id): Path<String>,
) -> Result<Json<ServiceResponse>> {
    let services = state.services();
    let service = get_visible(services.services.as_ref(), &id).await?;
    let channel_ids = visible_channel_connections(services, service.id)
        .await?
        .iter()
        .map(|c| c.service_channel_id)
        .collect();
    Ok(Json(ServiceResponse::project(&service, channel_ids, state.shape())))
}

/// Services of one organization given by id, business code or oid.
pub async fn list_by_organization(
    State(state): State<VersionedState>,
    Query(query): Query<OrganizationQuery>,
) -> Result<Json<PagedResult<ListItem>>> {
    let params = query.scope(state.services(), state.oid_pattern()).await?;
    let store = state.services().services.as_ref();
    Ok(Json(list_entities(store, params, state.page_size(), state.shape()).await?))
}

pub async fn add_service(
    State(state): State<VersionedState>,
    auth: Authenticated,
    body: Bytes,
) -> Result<Json<ServiceResponse>> {
    let manager = ServiceManager::new(&state, &auth, WriteKey::New);
    Ok(Json(managers::run(&manager, &body).await?))
}

pub async fn save_service(
    State(state): State<VersionedState>,
    auth: Authenticated,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<ServiceResponse>> {
    let id = path_id(&id, "id")?;
    let manager = ServiceManager::new(&state, &auth, WriteKey::Id(id));
    Ok(Json(managers::run(&manager, &body).await?))
}

pub async fn save_service_by_source_id(
    State(state): State<VersionedState>,
    auth: Authenticated,
    Path(source_id): Path<String>,
    body: Bytes,
) -> Result<Json<ServiceResponse>> {
    let manager = ServiceManager::new(&state, &auth, WriteKey::SourceId(source_id));
    Ok(Json(managers::run(&manager, &body).await?))
}

pub fn service_router(prefix: &str, state: VersionedState) -> Router {
    let read = state.read_gate();
    let write = state.write_gate();

    Router::new()
        .route(
            prefix,
            guarded(get(list_services), read.clone()).merge(guarded(post(add_service), write.clone())),
        )
        .route(
            &format!("{}/list/organization", prefix),
            guarded(get(list_by_organization), read.clone()),
        )
        .route(
            &format!("{}/sourceId/{{source_id}}", prefix),
            guarded(put(save_service_by_source_id), write.clone()),
        )
        .route(
            &format!("{}/{{id}}", prefix),
            guarded(get(get_service), read).merge(guarded(put(save_service), write)),
        )
        .with_state(state)
}
