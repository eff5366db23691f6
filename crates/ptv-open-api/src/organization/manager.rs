//! Organization add/save.

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::dto::{OrganizationRequest, OrganizationResponse};
use crate::auth::AuthContext;
use crate::domain::{Organization, PublishingStatus};
use crate::manager::checks::{
    check_localized, check_publishing_status, check_reference, check_source_id_free,
    check_transition, resolve_by_id, resolve_by_source_id, source_for,
};
use crate::manager::{EntityManager, Target, WriteKey};
use crate::shared::error::{ApiError, Result};
use crate::shared::state::VersionedState;
use crate::validation::patterns::BUSINESS_CODE;
use crate::validation::{ParameterValidator, RegExValidator, ValidationErrors};

pub struct OrganizationManager<'a> {
    state: &'a VersionedState,
    auth: &'a AuthContext,
    key: WriteKey,
}

impl<'a> OrganizationManager<'a> {
    pub fn new(state: &'a VersionedState, auth: &'a AuthContext, key: WriteKey) -> Self {
        Self { state, auth, key }
    }
}

#[async_trait]
impl EntityManager for OrganizationManager<'_> {
    type Request = OrganizationRequest;
    type Current = Organization;
    type Output = OrganizationResponse;

    fn normalize(&self, request: OrganizationRequest) -> OrganizationRequest {
        request.for_shape(self.state.contract.request)
    }

    async fn validate(&self, request: &OrganizationRequest, errors: &mut ValidationErrors) -> Result<()> {
        let services = self.state.services();

        check_localized(services, "names", &request.names, true, errors).await?;
        check_localized(services, "descriptions", &request.descriptions, false, errors).await?;
        RegExValidator::new(request.business_code.as_deref(), "businessCode", &BUSINESS_CODE)
            .validate(errors);
        RegExValidator::new(request.oid.as_deref(), "oid", self.state.oid_pattern()).validate(errors);
        check_publishing_status(request.publishing_status.as_deref(), errors);

        let parent = check_reference(
            services.organizations.as_ref(),
            "parentOrganizationId",
            request.parent_organization_id.as_deref(),
            errors,
        )
        .await?;
        if let (Some(parent), WriteKey::Id(id)) = (parent, &self.key) {
            if parent == *id {
                errors.add("parentOrganizationId", "Organization cannot be its own parent.");
            }
        }

        if self.key == WriteKey::New {
            check_source_id_free(
                services.organizations.as_ref(),
                request.source_id.as_deref(),
                self.auth.organization_id,
                errors,
            )
            .await?;
        }
        Ok(())
    }

    async fn resolve_target(&self) -> Result<Target<Organization>> {
        let store = self.state.services().organizations.as_ref();
        match &self.key {
            WriteKey::New => Ok(Target::New),
            WriteKey::Id(id) => resolve_by_id(store, *id).await.map(Target::Existing),
            WriteKey::SourceId(source_id) => resolve_by_source_id(store, source_id, self.auth.organization_id)
                .await
                .map(Target::Existing),
        }
    }

    async fn check_current(
        &self,
        request: &OrganizationRequest,
        current: &Organization,
        errors: &mut ValidationErrors,
    ) -> Result<()> {
        if !self.auth.can_see_organization(current.id) {
            return Err(ApiError::forbidden(format!(
                "User has no rights to update organization '{}'.",
                current.id
            )));
        }
        check_transition(current.publishing_status, request.publishing_status.as_deref(), errors);
        Ok(())
    }

    async fn execute(&self, request: OrganizationRequest, target: Target<Organization>) -> Result<OrganizationResponse> {
        let current = target.current();
        let requested_source = match &self.key {
            WriteKey::SourceId(source_id) => Some(source_id.as_str()),
            _ => request.source_id.as_deref(),
        };

        // Standard requests cannot carry oid or parent, so those survive from the current version.
        let carried = current.filter(|_| !self.state.contract.uses_extended_request());

        let organization = Organization {
            id: current.map(|c| c.id).unwrap_or_else(Uuid::new_v4),
            source: source_for(
                requested_source,
                self.auth.organization_id,
                current.and_then(|c| c.source.as_ref()),
            ),
            parent_id: request
                .parent_organization_id
                .as_deref()
                .and_then(|p| Uuid::try_parse(p).ok())
                .or_else(|| carried.and_then(|c| c.parent_id)),
            business_code: request.business_code.clone(),
            oid: request
                .oid
                .clone()
                .or_else(|| carried.and_then(|c| c.oid.clone())),
            organization_type: request.organization_type.clone(),
            names: request.names,
            descriptions: request.descriptions,
            publishing_status: request
                .publishing_status
                .as_deref()
                .and_then(PublishingStatus::parse)
                .unwrap_or(PublishingStatus::Draft),
            modified: Utc::now(),
        };

        let saved = self.state.services().organizations.save(organization).await?;
        info!(
            organization_id = %saved.id,
            version = %self.state.contract.version,
            subject = %self.auth.subject,
            "Organization saved"
        );
        Ok(OrganizationResponse::project(&saved, self.state.shape()))
    }
}
