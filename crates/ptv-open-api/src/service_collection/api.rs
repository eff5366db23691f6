//! Service collection API
//!
//! `/api/v{N}/ServiceCollection` endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use bytes::Bytes;

use super::dto::ServiceCollectionResponse;
use super::manager::ServiceCollectionManager;
use crate::manager::{self as managers, WriteKey};
use crate::organization::OrganizationQuery;
use crate::shared::api_common::{get_visible, list_entities, path_id, ListItem, ListQuery, PagedResult};
use crate::shared::error::Result;
use crate::shared::middleware::{guarded, Authenticated};
use crate::shared::state::VersionedState;

pub async fn list_collections(
    State(state): State<VersionedState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PagedResult<ListItem>>> {
    let params = query.into_params()?;
    let store = state.services().collections.as_ref();
    Ok(Json(list_entities(store, params, state.page_size(), state.shape()).await?))
}

pub async fn get_collection(
    State(state): State<VersionedState>,
    Path(id): Path<String>,
) -> Result<Json<ServiceCollectionResponse>> {
    let collection = get_visible(state.services().collections.as_ref(), &id).await?;
    Ok(Json(ServiceCollectionResponse::project(&collection, state.shape())))
}

pub async fn list_by_organization(
    State(state): State<VersionedState>,
    Query(query): Query<OrganizationQuery>,
) -> Result<Json<PagedResult<ListItem>>> {
    let params = query.scope(state.services(), state.oid_pattern()).await?;
    let store = state.services().collections.as_ref();
    Ok(Json(list_entities(store, params, state.page_size(), state.shape()).await?))
}

pub async fn add_collection(
    State(state): State<VersionedState>,
    auth: Authenticated,
    body: Bytes,
) -> Result<Json<ServiceCollectionResponse>> {
    let manager = ServiceCollectionManager::new(&state, &auth, WriteKey::New);
    Ok(Json(managers::run(&manager, &body).await?))
}

pub async fn save_collection(
    State(state): State<VersionedState>,
    auth: Authenticated,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<ServiceCollectionResponse>> {
    let id = path_id(&id, "id")?;
    let manager = ServiceCollectionManager::new(&state, &auth, WriteKey::Id(id));
    Ok(Json(managers::run(&manager, &body).await?))
}

pub fn service_collection_router(prefix: &str, state: VersionedState) -> Router {
    let read = state.read_gate();
    let write = state.write_gate();

    Router::new()
        .route(
            prefix,
            guarded(get(list_collections), read.clone()).merge(guarded(post(add_collection), write.clone())),
        )
        .route(
            &format!("{}/organization", prefix),
            guarded(get(list_by_organization), read.clone()),
        )
        .route(
            &format!("{}/{{id}}", prefix),
            guarded(get(get_collection), read).merge(guarded(put(save_collection), write)),
        )
        .with_state(state)
}
