//! Service collection request and response contracts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{LocalizedText, PublishingStatus, ServiceCollection};
use crate::version::ResponseShape;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCollectionRequest {
    pub source_id: Option<String>,
    pub organization_id: Option<String>,
    #[serde(default)]
    pub names: Vec<LocalizedText>,
    #[serde(default)]
    pub descriptions: Vec<LocalizedText>,
    /// Member services. Malformed entries abort the request.
    #[serde(default)]
    pub service_ids: Vec<String>,
    pub publishing_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCollectionResponse {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    pub organization_id: Uuid,
    pub names: Vec<LocalizedText>,
    pub descriptions: Vec<LocalizedText>,
    pub service_ids: Vec<Uuid>,
    pub publishing_status: PublishingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
}

impl ServiceCollectionResponse {
    pub fn project(collection: &ServiceCollection, shape: ResponseShape) -> Self {
        Self {
            id: collection.id,
            source_id: collection.source.as_ref().map(|s| s.value.clone()),
            organization_id: collection.organization_id,
            names: collection.names.clone(),
            descriptions: collection.descriptions.clone(),
            service_ids: collection.service_ids.clone(),
            publishing_status: collection.publishing_status,
            modified: shape.is_extended().then_some(collection.modified),
        }
    }
}
