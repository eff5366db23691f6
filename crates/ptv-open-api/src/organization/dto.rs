//! Organization request and response contracts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{LocalizedText, Organization, PublishingStatus};
use crate::version::{RequestShape, ResponseShape};

/// Organization write body. `oid` and `parentOrganizationId` are read
/// from v9 on.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationRequest {
    pub source_id: Option<String>,
    pub parent_organization_id: Option<String>,
    pub business_code: Option<String>,
    pub oid: Option<String>,
    pub organization_type: Option<String>,
    #[serde(default)]
    pub names: Vec<LocalizedText>,
    #[serde(default)]
    pub descriptions: Vec<LocalizedText>,
    pub publishing_status: Option<String>,
}

impl OrganizationRequest {
    pub fn for_shape(mut self, shape: RequestShape) -> Self {
        if shape == RequestShape::Standard {
            self.oid = None;
            self.parent_organization_id = None;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationResponse {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_organization_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_type: Option<String>,
    pub names: Vec<LocalizedText>,
    pub descriptions: Vec<LocalizedText>,
    pub publishing_status: PublishingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
}

impl OrganizationResponse {
    pub fn project(organization: &Organization, shape: ResponseShape) -> Self {
        let extended = shape.is_extended();
        Self {
            id: organization.id,
            source_id: organization.source.as_ref().map(|s| s.value.clone()),
            parent_organization_id: organization.parent_id.filter(|_| extended),
            business_code: organization.business_code.clone(),
            oid: organization.oid.clone().filter(|_| extended),
            organization_type: organization.organization_type.clone(),
            names: organization.names.clone(),
            descriptions: organization.descriptions.clone(),
            publishing_status: organization.publishing_status,
            modified: extended.then_some(organization.modified),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn organization() -> Organization {
        Organization {
            id: Uuid::new_v4(),
            source: None,
            parent_id: Some(Uuid::new_v4()),
            business_code: Some("1234567-8".into()),
            oid: Some("1.2.3".into()),
            organization_type: None,
            names: vec![LocalizedText::new("fi", "Org")],
            descriptions: vec![],
            publishing_status: PublishingStatus::Published,
            modified: Utc::now(),
        }
    }

    #[test]
    fn test_extended_fields_only_in_extended_shape() {
        let org = organization();

        let standard = OrganizationResponse::project(&org, ResponseShape::Standard);
        assert!(standard.oid.is_none());
        assert!(standard.parent_organization_id.is_none());
        assert!(standard.modified.is_none());

        let extended = OrganizationResponse::project(&org, ResponseShape::Extended);
        assert_eq!(extended.oid.as_deref(), Some("1.2.3"));
        assert_eq!(extended.parent_organization_id, org.parent_id);
        assert!(extended.modified.is_some());
    }

    #[test]
    fn test_standard_request_ignores_extended_fields() {
        let request = OrganizationRequest {
            oid: Some("1.2".into()),
            parent_organization_id: Some("x".into()),
            ..Default::default()
        };
        let mapped = request.clone().for_shape(RequestShape::Standard);
        assert!(mapped.oid.is_none());
        assert!(mapped.parent_organization_id.is_none());

        let kept = request.for_shape(RequestShape::Extended);
        assert_eq!(kept.oid.as_deref(), Some("1.2"));
    }
}
