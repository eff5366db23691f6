//! General description request and response contracts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{FintoTerms, GeneralDescription, LocalizedText, PublishingStatus};
use crate::version::ResponseShape;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralDescriptionRequest {
    #[serde(default)]
    pub names: Vec<LocalizedText>,
    #[serde(default)]
    pub descriptions: Vec<LocalizedText>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(flatten)]
    pub finto: FintoTerms,
    pub publishing_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralDescriptionResponse {
    pub id: Uuid,
    pub names: Vec<LocalizedText>,
    pub descriptions: Vec<LocalizedText>,
    pub languages: Vec<String>,
    #[serde(flatten)]
    pub finto: FintoTerms,
    pub publishing_status: PublishingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
}

impl GeneralDescriptionResponse {
    pub fn project(description: &GeneralDescription, shape: ResponseShape) -> Self {
        Self {
            id: description.id,
            names: description.names.clone(),
            descriptions: description.descriptions.clone(),
            languages: description.languages.clone(),
            finto: description.finto.clone(),
            publishing_status: description.publishing_status,
            modified: shape.is_extended().then_some(description.modified),
        }
    }
}
