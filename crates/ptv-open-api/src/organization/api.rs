//! Organization API
//!
//! `/api/v{N}/Organization` endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use bytes::Bytes;

use super::dto::OrganizationResponse;
use super::manager::OrganizationManager;
use super::resolver::{self, OrganizationQuery};
use crate::manager::{self as managers, WriteKey};
use crate::shared::api_common::{
    ensure_valid, get_visible, list_entities, path_id, ListItem, ListQuery, PagedResult,
};
use crate::shared::error::{ApiError, Result};
use crate::shared::middleware::{guarded, Authenticated};
use crate::shared::state::VersionedState;
use crate::validation::patterns::BUSINESS_CODE;
use crate::validation::{ParameterValidator, RegExValidator, ValidationErrors};

/// Paged organizations, optionally the archived ones.
pub async fn list_organizations(
    State(state): State<VersionedState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PagedResult<ListItem>>> {
    let params = query.into_params()?;
    let store = state.services().organizations.as_ref();
    Ok(Json(list_entities(store, params, state.page_size(), state.shape()).await?))
}

pub async fn get_organization(
    State(state): State<VersionedState>,
    Path(id): Path<String>,
) -> Result<Json<OrganizationResponse>> {
    let organization = get_visible(state.services().organizations.as_ref(), &id).await?;
    Ok(Json(OrganizationResponse::project(&organization, state.shape())))
}

/// All organizations sharing a business code.
pub async fn get_by_business_code(
    State(state): State<VersionedState>,
    Path(code): Path<String>,
) -> Result<Json<Vec<OrganizationResponse>>> {
    let mut errors = ValidationErrors::new();
    RegExValidator::new(Some(&code), "code", &BUSINESS_CODE).validate(&mut errors);
    ensure_valid(errors)?;

    let organizations = state.services().organization_lookup.find_by_business_code(&code).await?;
    if organizations.is_empty() {
        return Err(ApiError::not_found(format!("Organizations with code '{}' not found.", code)));
    }
    Ok(Json(
        organizations
            .iter()
            .map(|o| OrganizationResponse::project(o, state.shape()))
            .collect(),
    ))
}

pub async fn get_by_oid(
    State(state): State<VersionedState>,
    Path(oid): Path<String>,
) -> Result<Json<OrganizationResponse>> {
    let mut errors = ValidationErrors::new();
    RegExValidator::new(Some(&oid), "oid", state.oid_pattern()).validate(&mut errors);
    ensure_valid(errors)?;

    let organization = state
        .services()
        .organization_lookup
        .find_by_oid(&oid)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Organization with oid '{}' not found.", oid)))?;
    Ok(Json(OrganizationResponse::project(&organization, state.shape())))
}

/// Resolved organizations followed by all their sub-organizations.
pub async fn list_with_sub_organizations(
    State(state): State<VersionedState>,
    Query(query): Query<OrganizationQuery>,
) -> Result<Json<Vec<OrganizationResponse>>> {
    let mut errors = ValidationErrors::new();
    let resolved = resolver::resolve(
        state.services(),
        query.organization_id.as_deref(),
        query.code.as_deref(),
        query.oid.as_deref(),
        true,
        state.oid_pattern(),
        &mut errors,
    )
    .await?;
    ensure_valid(errors)?;

    let mut organizations = resolved.unwrap_or_default();
    let ids: Vec<_> = organizations.iter().map(|o| o.id).collect();
    let children = state.services().organization_lookup.sub_organizations(&ids).await?;
    organizations.extend(children);

    Ok(Json(
        organizations
            .iter()
            .map(|o| OrganizationResponse::project(o, state.shape()))
            .collect(),
    ))
}

pub async fn add_organization(
    State(state): State<VersionedState>,
    auth: Authenticated,
    body: Bytes,
) -> Result<Json<OrganizationResponse>> {
    let manager = OrganizationManager::new(&state, &auth, WriteKey::New);
    Ok(Json(managers::run(&manager, &body).await?))
}

pub async fn save_organization(
    State(state): State<VersionedState>,
    auth: Authenticated,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<OrganizationResponse>> {
    let id = path_id(&id, "id")?;
    let manager = OrganizationManager::new(&state, &auth, WriteKey::Id(id));
    Ok(Json(managers::run(&manager, &body).await?))
}

pub async fn save_organization_by_source_id(
    State(state): State<VersionedState>,
    auth: Authenticated,
    Path(source_id): Path<String>,
    body: Bytes,
) -> Result<Json<OrganizationResponse>> {
    let manager = OrganizationManager::new(&state, &auth, WriteKey::SourceId(source_id));
    Ok(Json(managers::run(&manager, &body).await?))
}

/// Routes under `prefix` (`/api/v{N}/Organization`).
pub fn organization_router(prefix: &str, state: VersionedState) -> Router {
    let read = state.read_gate();
    let write = state.write_gate();

    Router::new()
        .route(
            prefix,
            guarded(get(list_organizations), read.clone())
                .merge(guarded(post(add_organization), write.clone())),
        )
        .route(
            &format!("{}/list", prefix),
            guarded(get(list_with_sub_organizations), read.clone()),
        )
        .route(
            &format!("{}/businesscode/{{code}}", prefix),
            guarded(get(get_by_business_code), read.clone()),
        )
        .route(&format!("{}/oid/{{oid}}", prefix), guarded(get(get_by_oid), read.clone()))
        .route(
            &format!("{}/sourceId/{{source_id}}", prefix),
            guarded(put(save_organization_by_source_id), write.clone()),
        )
        .route(
            &format!("{}/{{id}}", prefix),
            guarded(get(get_organization), read).merge(guarded(put(save_organization), write)),
        )
        .with_state(state)
}
