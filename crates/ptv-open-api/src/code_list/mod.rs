//! Reference Code Lists
//!
//! Language, municipality and country codes. Read only.

use axum::{extract::State, routing::get, Json, Router};

use crate::domain::CodeItem;
use crate::shared::error::Result;
use crate::shared::middleware::guarded;
use crate::shared::state::VersionedState;

pub async fn get_language_codes(State(state): State<VersionedState>) -> Result<Json<Vec<CodeItem>>> {
    Ok(Json(state.services().codes.language_codes().await?))
}

pub async fn get_municipality_codes(State(state): State<VersionedState>) -> Result<Json<Vec<CodeItem>>> {
    Ok(Json(state.services().codes.municipality_codes().await?))
}

pub async fn get_country_codes(State(state): State<VersionedState>) -> Result<Json<Vec<CodeItem>>> {
    Ok(Json(state.services().codes.country_codes().await?))
}

pub fn code_list_router(prefix: &str, state: VersionedState) -> Router {
    let read = state.read_gate();

    Router::new()
        .route(
            &format!("{}/GetLanguageCodes", prefix),
            guarded(get(get_language_codes), read.clone()),
        )
        .route(
            &format!("{}/GetMunicipalityCodes", prefix),
            guarded(get(get_municipality_codes), read.clone()),
        )
        .route(&format!("{}/GetCountryCodes", prefix), guarded(get(get_country_codes), read))
        .with_state(state)
}
