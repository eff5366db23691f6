//! Service collection add/save.

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::dto::{ServiceCollectionRequest, ServiceCollectionResponse};
use crate::auth::AuthContext;
use crate::domain::{PublishingStatus, ServiceCollection};
use crate::manager::checks::{
    check_localized, check_organization_reference, check_publishing_status, check_reference,
    check_source_id_free, check_transition, resolve_by_id, source_for,
};
use crate::manager::{EntityManager, Target, WriteKey};
use crate::shared::error::{ApiError, Result};
use crate::shared::state::VersionedState;
use crate::validation::{GuidParser, ValidationErrors};

pub struct ServiceCollectionManager<'a> {
    state: &'a VersionedState,
    auth: &'a AuthContext,
    key: WriteKey,
}

impl<'a> ServiceCollectionManager<'a> {
    pub fn new(state: &'a VersionedState, auth: &'a AuthContext, key: WriteKey) -> Self {
        Self { state, auth, key }
    }
}

#[async_trait]
impl EntityManager for ServiceCollectionManager<'_> {
    type Request = ServiceCollectionRequest;
    type Current = ServiceCollection;
    type Output = ServiceCollectionResponse;

    async fn validate(&self, request: &ServiceCollectionRequest, errors: &mut ValidationErrors) -> Result<()> {
        let services = self.state.services();

        // nested ids are parsed before any field is checked
        for id in &request.service_ids {
            GuidParser::parse(id)?;
        }

        check_organization_reference(
            services,
            self.auth,
            "organizationId",
            request.organization_id.as_deref(),
            true,
            errors,
        )
        .await?;
        check_localized(services, "names", &request.names, true, errors).await?;
        check_localized(services, "descriptions", &request.descriptions, false, errors).await?;
        for (i, id) in request.service_ids.iter().enumerate() {
            check_reference(services.services.as_ref(), &format!("serviceIds[{}]", i), Some(id), errors).await?;
        }
        check_publishing_status(request.publishing_status.as_deref(), errors);

        if self.key == WriteKey::New {
            check_source_id_free(
                services.collections.as_ref(),
                request.source_id.as_deref(),
                self.auth.organization_id,
                errors,
            )
            .await?;
        }
        Ok(())
    }

    async fn resolve_target(&self) -> Result<Target<ServiceCollection>> {
        match &self.key {
            WriteKey::Id(id) => resolve_by_id(self.state.services().collections.as_ref(), *id)
                .await
                .map(Target::Existing),
            _ => Ok(Target::New),
        }
    }

    async fn check_current(
        &self,
        request: &ServiceCollectionRequest,
        current: &ServiceCollection,
        errors: &mut ValidationErrors,
    ) -> Result<()> {
        if !self.auth.can_see_organization(current.organization_id) {
            return Err(ApiError::forbidden(format!(
                "User has no rights to update service collection '{}'.",
                current.id
            )));
        }
        check_transition(current.publishing_status, request.publishing_status.as_deref(), errors);
        Ok(())
    }

    async fn execute(
        &self,
        request: ServiceCollectionRequest,
        target: Target<ServiceCollection>,
    ) -> Result<ServiceCollectionResponse> {
        let current = target.current();
        let organization_id = request
            .organization_id
            .as_deref()
            .and_then(|o| Uuid::try_parse(o).ok())
            .ok_or_else(|| ApiError::Internal("organizationId missing after validation".to_string()))?;

        let mut service_ids: Vec<Uuid> = Vec::with_capacity(request.service_ids.len());
        for id in &request.service_ids {
            let id = GuidParser::parse(id)?;
            if !service_ids.contains(&id) {
                service_ids.push(id);
            }
        }

        let collection = ServiceCollection {
            id: current.map(|c| c.id).unwrap_or_else(Uuid::new_v4),
            source: source_for(
                request.source_id.as_deref(),
                self.auth.organization_id,
                current.and_then(|c| c.source.as_ref()),
            ),
            organization_id,
            names: request.names,
            descriptions: request.descriptions,
            service_ids,
            publishing_status: request
                .publishing_status
                .as_deref()
                .and_then(PublishingStatus::parse)
                .unwrap_or(PublishingStatus::Draft),
            modified: Utc::now(),
        };

        let saved = self.state.services().collections.save(collection).await?;
        info!(
            collection_id = %saved.id,
            services = saved.service_ids.len(),
            version = %self.state.contract.version,
            "Service collection saved"
        );
        Ok(ServiceCollectionResponse::project(&saved, self.state.shape()))
    }
}
