//! Service channel API
//!
//! `/api/v{N}/ServiceChannel` endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use bytes::Bytes;
use serde::Deserialize;

use super::dto::ServiceChannelResponse;
use super::manager::ServiceChannelManager;
use crate::connection::visible_service_connections;
use crate::domain::ListFilter;
use crate::manager::{self as managers, WriteKey};
use crate::shared::api_common::{
    ensure_valid, get_visible, list_entities, parse_page, path_id, ListItem, ListParams, ListQuery,
    PagedResult,
};
use crate::shared::error::{ApiError, Result};
use crate::shared::middleware::{guarded, Authenticated};
use crate::shared::state::VersionedState;
use crate::validation::ValidationErrors;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

pub async fn list_channels(
    State(state): State<VersionedState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PagedResult<ListItem>>> {
    let params = query.into_params()?;
    let store = state.services().channels.as_ref();
    Ok(Json(list_entities(store, params, state.page_size(), state.shape()).await?))
}

pub async fn get_channel(
    State(state): State<VersionedState>,
    Path(id): Path<String>,
) -> Result<Json<ServiceChannelResponse>> {
    let services = state.services();
    let channel = get_visible(services.channels.as_ref(), &id).await?;
    let service_ids = visible_service_connections(services, channel.id)
        .await?
        .iter()
        .map(|c| c.service_id)
        .collect();
    Ok(Json(ServiceChannelResponse::project(&channel, service_ids, state.shape())))
}

/// Channels owned by one organization.
pub async fn list_by_organization(
    State(state): State<VersionedState>,
    Path(organization_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PagedResult<ListItem>>> {
    let id = path_id(&organization_id, "organizationId")?;
    let mut errors = ValidationErrors::new();
    let page = parse_page(query.page.as_deref(), &mut errors);
    ensure_valid(errors)?;

    let services = state.services();
    services
        .organizations
        .get(id)
        .await?
        .filter(|o| o.publishing_status.is_visible())
        .ok_or_else(|| ApiError::not_found(format!("Organization with id '{}' not found.", id)))?;

    let params = ListParams {
        filter: ListFilter { organization_ids: Some(vec![id]), ..ListFilter::default() },
        page,
    };
    Ok(Json(
        list_entities(services.channels.as_ref(), params, state.page_size(), state.shape()).await?,
    ))
}

pub async fn add_channel(
    State(state): State<VersionedState>,
    auth: Authenticated,
    body: Bytes,
) -> Result<Json<ServiceChannelResponse>> {
    let manager = ServiceChannelManager::new(&state, &auth, WriteKey::New);
    Ok(Json(managers::run(&manager, &body).await?))
}

pub async fn save_channel(
    State(state): State<VersionedState>,
    auth: Authenticated,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<ServiceChannelResponse>> {
    let id = path_id(&id, "id")?;
    let manager = ServiceChannelManager::new(&state, &auth, WriteKey::Id(id));
    Ok(Json(managers::run(&manager, &body).await?))
}

pub async fn save_channel_by_source_id(
    State(state): State<VersionedState>,
    auth: Authenticated,
    Path(source_id): Path<String>,
    body: Bytes,
) -> Result<Json<ServiceChannelResponse>> {
    let manager = ServiceChannelManager::new(&state, &auth, WriteKey::SourceId(source_id));
    Ok(Json(managers::run(&manager, &body).await?))
}

pub fn service_channel_router(prefix: &str, state: VersionedState) -> Router {
    let read = state.read_gate();
    let write = state.write_gate();

    Router::new()
        .route(
            prefix,
            guarded(get(list_channels), read.clone()).merge(guarded(post(add_channel), write.clone())),
        )
        .route(
            &format!("{}/organization/{{organization_id}}", prefix),
            guarded(get(list_by_organization), read.clone()),
        )
        .route(
            &format!("{}/sourceId/{{source_id}}", prefix),
            guarded(put(save_channel_by_source_id), write.clone()),
        )
        .route(
            &format!("{}/{{id}}", prefix),
            guarded(get(get_channel), read).merge(guarded(put(save_channel), write)),
        )
        .with_state(state)
}
