//! Service request and response contracts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{FintoTerms, LocalizedText, PublishingStatus, Service};
use crate::version::{RequestShape, ResponseShape};

pub const SERVICE_TYPES: [&str; 3] = ["Service", "PermissionAndObligation", "ProfessionalQualifications"];

/// Service write body. `generalDescriptionId` is read from v9 on.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub source_id: Option<String>,
    pub organization_id: Option<String>,
    pub general_description_id: Option<String>,
    pub service_type: Option<String>,
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

impl ServiceRequest {
    pub fn for_shape(mut self, shape: RequestShape) -> Self {
        if shape == RequestShape::Standard {
            self.general_description_id = None;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    pub organization_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_description_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    pub names: Vec<LocalizedText>,
    pub descriptions: Vec<LocalizedText>,
    pub languages: Vec<String>,
    #[serde(flatten)]
    pub finto: FintoTerms,
    pub publishing_status: PublishingStatus,
    /// Connected channel ids, extended shape only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_channels: Option<Vec<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
}

impl ServiceResponse {
    pub fn project(service: &Service, channel_ids: Vec<Uuid>, shape: ResponseShape) -> Self {
        let extended = shape.is_extended();
        Self {
            id: service.id,
            source_id: service.source.as_ref().map(|s| s.value.clone()),
            organization_id: service.organization_id,
            general_description_id: service.general_description_id.filter(|_| extended),
            service_type: service.service_type.clone(),
            names: service.names.clone(),
            descriptions: service.descriptions.clone(),
            languages: service.languages.clone(),
            finto: service.finto.clone(),
            publishing_status: service.publishing_status,
            service_channels: extended.then_some(channel_ids),
            modified: extended.then_some(service.modified),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_reads_flattened_finto_lists() {
        let request: ServiceRequest = serde_json::from_value(serde_json::json!({
            "organizationId": "x",
            "names": [{ "language": "fi", "value": "Palvelu" }],
            "serviceClasses": ["http://a"],
            "publishingStatus": "Published"
        }))
        .unwrap();

        assert_eq!(request.finto.service_classes, vec!["http://a".to_string()]);
        assert!(request.finto.target_groups.is_empty());
        assert_eq!(request.names.len(), 1);
    }

    #[test]
    fn test_legacy_projection_hides_relations() {
        let service = Service {
            id: Uuid::new_v4(),
            source: None,
            organization_id: Uuid::new_v4(),
            general_description_id: Some(Uuid::new_v4()),
            service_type: None,
            names: vec![],
            descriptions: vec![],
            languages: vec![],
            finto: FintoTerms::default(),
            publishing_status: PublishingStatus::Published,
            modified: Utc::now(),
        };
        let channel = Uuid::new_v4();

        let json = serde_json::to_value(ServiceResponse::project(&service, vec![channel], ResponseShape::Legacy)).unwrap();
        assert!(json.get("serviceChannels").is_none());
        assert!(json.get("generalDescriptionId").is_none());

        let json = serde_json::to_value(ServiceResponse::project(&service, vec![channel], ResponseShape::Extended)).unwrap();
        assert_eq!(json["serviceChannels"][0], serde_json::json!(channel));
    }
}
