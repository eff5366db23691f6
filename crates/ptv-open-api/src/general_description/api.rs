//! General description API
//!
//! `/api/v{N}/GeneralDescription` endpoints. Writes are limited to the
//! Eeva role by the dispatch table.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use bytes::Bytes;

use super::dto::GeneralDescriptionResponse;
use super::manager::GeneralDescriptionManager;
use crate::manager::{self as managers, WriteKey};
use crate::shared::api_common::{get_visible, list_entities, path_id, ListItem, ListQuery, PagedResult};
use crate::shared::error::Result;
use crate::shared::middleware::{guarded, Authenticated};
use crate::shared::state::VersionedState;

pub async fn list_general_descriptions(
    State(state): State<VersionedState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PagedResult<ListItem>>> {
    let params = query.into_params()?;
    let store = state.services().general_descriptions.as_ref();
    Ok(Json(list_entities(store, params, state.page_size(), state.shape()).await?))
}

pub async fn get_general_description(
    State(state): State<VersionedState>,
    Path(id): Path<String>,
) -> Result<Json<GeneralDescriptionResponse>> {
    let description = get_visible(state.services().general_descriptions.as_ref(), &id).await?;
    Ok(Json(GeneralDescriptionResponse::project(&description, state.shape())))
}

pub async fn add_general_description(
    State(state): State<VersionedState>,
    auth: Authenticated,
    body: Bytes,
) -> Result<Json<GeneralDescriptionResponse>> {
    let manager = GeneralDescriptionManager::new(&state, &auth, WriteKey::New);
    Ok(Json(managers::run(&manager, &body).await?))
}

pub async fn save_general_description(
    State(state): State<VersionedState>,
    auth: Authenticated,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<GeneralDescriptionResponse>> {
    let id = path_id(&id, "id")?;
    let manager = GeneralDescriptionManager::new(&state, &auth, WriteKey::Id(id));
    Ok(Json(managers::run(&manager, &body).await?))
}

pub fn general_description_router(prefix: &str, state: VersionedState) -> Router {
    let read = state.read_gate();
    let write = state.write_gate();

    Router::new()
        .route(
            prefix,
            guarded(get(list_general_descriptions), read.clone())
                .merge(guarded(post(add_general_description), write.clone())),
        )
        .route(
            &format!("{}/{{id}}", prefix),
            guarded(get(get_general_description), read).merge(guarded(put(save_general_description), write)),
        )
        .with_state(state)
}
