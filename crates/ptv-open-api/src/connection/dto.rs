//! Connection request and response contracts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Connection, LocalizedText};
use crate::version::{RequestShape, ResponseShape};

/// Connection classifications accepted in extended requests.
pub const EXTRA_TYPES: [&str; 2] = ["Asti", "Sote"];

/// One channel of `PUT /Connection/serviceId/{serviceId}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelRelationRequest {
    pub service_channel_id: Option<String>,
    #[serde(default)]
    pub extra_types: Vec<String>,
    #[serde(default)]
    pub description: Vec<LocalizedText>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConnectionsRequest {
    /// Remove connections missing from `channelRelations`.
    #[serde(default)]
    pub delete_all_channel_relations: bool,
    #[serde(default)]
    pub channel_relations: Vec<ChannelRelationRequest>,
}

/// One service of `PUT /Connection/serviceChannelId/{serviceChannelId}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRelationRequest {
    pub service_id: Option<String>,
    #[serde(default)]
    pub extra_types: Vec<String>,
    #[serde(default)]
    pub description: Vec<LocalizedText>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelConnectionsRequest {
    #[serde(default)]
    pub delete_all_service_relations: bool,
    #[serde(default)]
    pub service_relations: Vec<ServiceRelationRequest>,
}

/// Entry of the `POST /Connection` array.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRequest {
    pub service_id: Option<String>,
    pub service_channel_id: Option<String>,
    #[serde(default)]
    pub extra_types: Vec<String>,
    #[serde(default)]
    pub description: Vec<LocalizedText>,
}

impl ServiceConnectionsRequest {
    pub fn for_shape(mut self, shape: RequestShape) -> Self {
        if shape == RequestShape::Standard {
            self.channel_relations.iter_mut().for_each(|r| r.extra_types.clear());
        }
        self
    }
}

impl ChannelConnectionsRequest {
    pub fn for_shape(mut self, shape: RequestShape) -> Self {
        if shape == RequestShape::Standard {
            self.service_relations.iter_mut().for_each(|r| r.extra_types.clear());
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionResponse {
    pub service_id: Uuid,
    pub service_channel_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_types: Option<Vec<String>>,
    pub description: Vec<LocalizedText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
}

impl ConnectionResponse {
    pub fn project(connection: &Connection, shape: ResponseShape) -> Self {
        let extended = shape.is_extended();
        Self {
            service_id: connection.service_id,
            service_channel_id: connection.service_channel_id,
            extra_types: extended.then(|| connection.extra_types.clone()),
            description: connection.description.clone(),
            modified: extended.then_some(connection.modified),
        }
    }

    pub fn project_all(connections: &[Connection], shape: ResponseShape) -> Vec<Self> {
        connections.iter().map(|c| Self::project(c, shape)).collect()
    }
}

/// Connections of one service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConnectionsResponse {
    pub service_id: Uuid,
    pub service_channels: Vec<ConnectionResponse>,
}

/// Connections of one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelConnectionsResponse {
    pub service_channel_id: Uuid,
    pub services: Vec<ConnectionResponse>,
}
