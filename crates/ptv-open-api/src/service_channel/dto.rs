//! Service channel request and response contracts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{ChannelType, LocalizedText, PublishingStatus, ServiceChannel};
use crate::version::{RequestShape, ResponseShape};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceChannelRequest {
    pub source_id: Option<String>,
    pub organization_id: Option<String>,
    pub channel_type: Option<String>,
    #[serde(default)]
    pub names: Vec<LocalizedText>,
    #[serde(default)]
    pub descriptions: Vec<LocalizedText>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub is_visible_for_all: Option<bool>,
    pub publishing_status: Option<String>,
}

impl ServiceChannelRequest {
    /// Visibility for all is an extended field.
    pub fn for_shape(mut self, shape: RequestShape) -> Self {
        if shape == RequestShape::Standard {
            self.is_visible_for_all = None;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceChannelResponse {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    pub organization_id: Uuid,
    pub channel_type: ChannelType,
    pub names: Vec<LocalizedText>,
    pub descriptions: Vec<LocalizedText>,
    pub languages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_visible_for_all: Option<bool>,
    pub publishing_status: PublishingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
}

impl ServiceChannelResponse {
    pub fn project(channel: &ServiceChannel, service_ids: Vec<Uuid>, shape: ResponseShape) -> Self {
        let extended = shape.is_extended();
        Self {
            id: channel.id,
            source_id: channel.source.as_ref().map(|s| s.value.clone()),
            organization_id: channel.organization_id,
            channel_type: channel.channel_type,
            names: channel.names.clone(),
            descriptions: channel.descriptions.clone(),
            languages: channel.languages.clone(),
            is_visible_for_all: extended.then_some(channel.is_visible_for_all),
            publishing_status: channel.publishing_status,
            services: extended.then_some(service_ids),
            modified: extended.then_some(channel.modified),
        }
    }
}
