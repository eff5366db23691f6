//! Service add/save.

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::dto::{ServiceRequest, ServiceResponse, SERVICE_TYPES};
use crate::auth::AuthContext;
use crate::domain::{PublishingStatus, Service};
use crate::manager::checks::{
    check_finto_terms, check_languages, check_localized, check_organization_reference,
    check_publishing_status, check_reference, check_source_id_free, check_transition,
    resolve_by_id, resolve_by_source_id, source_for,
};
use crate::manager::{EntityManager, Target, WriteKey};
use crate::shared::error::{ApiError, Result};
use crate::shared::state::VersionedState;
use crate::validation::{EnumValidator, ParameterValidator, ValidationErrors};

pub struct ServiceManager<'a> {
    state: &'a VersionedState,
    auth: &'a AuthContext,
    key: WriteKey,
}

impl<'a> ServiceManager<'a> {
    pub fn new(state: &'a VersionedState, auth: &'a AuthContext, key: WriteKey) -> Self {
        Self { state, auth, key }
    }
}

#[async_trait]
impl EntityManager for ServiceManager<'_> {
    type Request = ServiceRequest;
    type Current = Service;
    type Output = ServiceResponse;

    fn normalize(&self, request: ServiceRequest) -> ServiceRequest {
        request.for_shape(self.state.contract.request)
    }

    async fn validate(&self, request: &ServiceRequest, errors: &mut ValidationErrors) -> Result<()> {
        let services = self.state.services();

        check_organization_reference(
            services,
            self.auth,
            "organizationId",
            request.organization_id.as_deref(),
            true,
            errors,
        )
        .await?;
        check_reference(
            services.general_descriptions.as_ref(),
            "generalDescriptionId",
            request.general_description_id.as_deref(),
            errors,
        )
        .await?;
        EnumValidator::new(request.service_type.as_deref(), "serviceType", &SERVICE_TYPES)
            .optional()
            .validate(errors);
        check_localized(services, "names", &request.names, true, errors).await?;
        check_localized(services, "descriptions", &request.descriptions, false, errors).await?;
        check_languages(services, "languages", &request.languages, errors).await?;
        check_finto_terms(services, &request.finto, errors).await?;
        check_publishing_status(request.publishing_status.as_deref(), errors);

        if self.key == WriteKey::New {
            check_source_id_free(
                services.services.as_ref(),
                request.source_id.as_deref(),
                self.auth.organization_id,
                errors,
            )
            .await?;
        }
        Ok(())
    }

    async fn resolve_target(&self) -> Result<Target<Service>> {
        let store = self.state.services().services.as_ref();
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
        request: &ServiceRequest,
        current: &Service,
        errors: &mut ValidationErrors,
    ) -> Result<()> {
        if !self.auth.can_see_organization(current.organization_id) {
            return Err(ApiError::forbidden(format!(
                "User has no rights to update service '{}'.",
                current.id
            )));
        }
        check_transition(current.publishing_status, request.publishing_status.as_deref(), errors);
        Ok(())
    }

    async fn execute(&self, request: ServiceRequest, target: Target<Service>) -> Result<ServiceResponse> {
        let services = self.state.services();
        let current = target.current();
        let requested_source = match &self.key {
            WriteKey::SourceId(source_id) => Some(source_id.as_str()),
            _ => request.source_id.as_deref(),
        };
        let carried = current.filter(|_| !self.state.contract.uses_extended_request());

        // organizationId was validated as a GUID above
        let organization_id = request
            .organization_id
            .as_deref()
            .and_then(|o| Uuid::try_parse(o).ok())
            .ok_or_else(|| ApiError::Internal("organizationId missing after validation".to_string()))?;

        let service = Service {
            id: current.map(|c| c.id).unwrap_or_else(Uuid::new_v4),
            source: source_for(
                requested_source,
                self.auth.organization_id,
                current.and_then(|c| c.source.as_ref()),
            ),
            organization_id,
            general_description_id: request
                .general_description_id
                .as_deref()
                .and_then(|g| Uuid::try_parse(g).ok())
                .or_else(|| carried.and_then(|c| c.general_description_id)),
            service_type: request.service_type.clone(),
            names: request.names,
            descriptions: request.descriptions,
            languages: request.languages,
            finto: request.finto,
            publishing_status: request
                .publishing_status
                .as_deref()
                .and_then(PublishingStatus::parse)
                .unwrap_or(PublishingStatus::Draft),
            modified: Utc::now(),
        };

        let saved = services.services.save(service).await?;
        info!(
            service_id = %saved.id,
            version = %self.state.contract.version,
            subject = %self.auth.subject,
            "Service saved"
        );

        let channel_ids = services
            .connections
            .for_service(saved.id)
            .await?
            .iter()
            .map(|c| c.service_channel_id)
            .collect();
        Ok(ServiceResponse::project(&saved, channel_ids, self.state.shape()))
    }
}
