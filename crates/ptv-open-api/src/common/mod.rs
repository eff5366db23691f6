//! Cross-kind listing
//!
//! `GET /api/v{N}/Common/EntitiesByType?type&date&dateBefore&page`

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::shared::api_common::{ensure_valid, list_entities, ListItem, ListQuery, PagedResult};
use crate::shared::error::{ApiError, Result};
use crate::shared::middleware::guarded;
use crate::shared::state::VersionedState;
use crate::validation::{EnumValidator, ParameterValidator, ValidationErrors};

pub const ENTITY_TYPES: [&str; 5] = [
    "Organization",
    "Service",
    "ServiceChannel",
    "ServiceCollection",
    "GeneralDescription",
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitiesByTypeQuery {
    #[serde(rename = "type")]
    pub entity_type: Option<String>,
    pub date: Option<String>,
    pub date_before: Option<String>,
    pub page: Option<String>,
}

pub async fn entities_by_type(
    State(state): State<VersionedState>,
    Query(query): Query<EntitiesByTypeQuery>,
) -> Result<Json<PagedResult<ListItem>>> {
    let mut errors = ValidationErrors::new();
    let validator = EnumValidator::new(query.entity_type.as_deref(), "type", &ENTITY_TYPES).case_insensitive();
    validator.validate(&mut errors);
    let params = ListQuery {
        date: query.date,
        date_before: query.date_before,
        page: query.page,
        archived: None,
    }
    .parse(&mut errors);
    let matched = validator.matched();
    ensure_valid(errors)?;

    let services = state.services();
    let (page_size, shape) = (state.page_size(), state.shape());
    let page = match matched {
        Some("Organization") => list_entities(services.organizations.as_ref(), params, page_size, shape).await?,
        Some("Service") => list_entities(services.services.as_ref(), params, page_size, shape).await?,
        Some("ServiceChannel") => list_entities(services.channels.as_ref(), params, page_size, shape).await?,
        Some("ServiceCollection") => list_entities(services.collections.as_ref(), params, page_size, shape).await?,
        Some("GeneralDescription") => {
            list_entities(services.general_descriptions.as_ref(), params, page_size, shape).await?
        }
        other => return Err(ApiError::Internal(format!("unmatched entity type {:?}", other))),
    };
    Ok(Json(page))
}

pub fn common_router(prefix: &str, state: VersionedState) -> Router {
    let read = state.read_gate();
    Router::new()
        .route(&format!("{}/EntitiesByType", prefix), guarded(get(entities_by_type), read))
        .with_state(state)
}
