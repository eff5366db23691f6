//! Service channel add/save.

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::dto::{ServiceChannelRequest, ServiceChannelResponse};
use crate::auth::AuthContext;
use crate::domain::{ChannelType, PublishingStatus, ServiceChannel};
use crate::manager::checks::{
    check_languages, check_localized, check_organization_reference, check_publishing_status,
    check_source_id_free, check_transition, resolve_by_id, resolve_by_source_id, source_for,
};
use crate::manager::{EntityManager, Target, WriteKey};
use crate::shared::error::{ApiError, Result};
use crate::shared::state::VersionedState;
use crate::validation::{EnumValidator, ParameterValidator, ValidationErrors};

pub struct ServiceChannelManager<'a> {
    state: &'a VersionedState,
    auth: &'a AuthContext,
    key: WriteKey,
}

impl<'a> ServiceChannelManager<'a> {
    pub fn new(state: &'a VersionedState, auth: &'a AuthContext, key: WriteKey) -> Self {
        Self { state, auth, key }
    }
}

#[async_trait]
impl EntityManager for ServiceChannelManager<'_> {
    type Request = ServiceChannelRequest;
    type Current = ServiceChannel;
    type Output = ServiceChannelResponse;

    fn normalize(&self, request: ServiceChannelRequest) -> ServiceChannelRequest {
        request.for_shape(self.state.contract.request)
    }

    async fn validate(&self, request: &ServiceChannelRequest, errors: &mut ValidationErrors) -> Result<()> {
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
        EnumValidator::new(request.channel_type.as_deref(), "channelType", &ChannelType::NAMES).validate(errors);
        check_localized(services, "names", &request.names, true, errors).await?;
        check_localized(services, "descriptions", &request.descriptions, false, errors).await?;
        check_languages(services, "languages", &request.languages, errors).await?;
        check_publishing_status(request.publishing_status.as_deref(), errors);

        if self.key == WriteKey::New {
            check_source_id_free(
                services.channels.as_ref(),
                request.source_id.as_deref(),
                self.auth.organization_id,
                errors,
            )
            .await?;
        }
        Ok(())
    }

    async fn resolve_target(&self) -> Result<Target<ServiceChannel>> {
        let store = self.state.services().channels.as_ref();
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
        request: &ServiceChannelRequest,
        current: &ServiceChannel,
        errors: &mut ValidationErrors,
    ) -> Result<()> {
        if !self.auth.can_see_organization(current.organization_id) {
            return Err(ApiError::forbidden(format!(
                "User has no rights to update service channel '{}'.",
                current.id
            )));
        }
        check_transition(current.publishing_status, request.publishing_status.as_deref(), errors);
        Ok(())
    }

    async fn execute(
        &self,
        request: ServiceChannelRequest,
        target: Target<ServiceChannel>,
    ) -> Result<ServiceChannelResponse> {
        let services = self.state.services();
        let current = target.current();
        let requested_source = match &self.key {
            WriteKey::SourceId(source_id) => Some(source_id.as_str()),
            _ => request.source_id.as_deref(),
        };

        let organization_id = request
            .organization_id
            .as_deref()
            .and_then(|o| Uuid::try_parse(o).ok())
            .ok_or_else(|| ApiError::Internal("organizationId missing after validation".to_string()))?;
        let channel_type = request
            .channel_type
            .as_deref()
            .and_then(ChannelType::parse)
            .ok_or_else(|| ApiError::Internal("channelType missing after validation".to_string()))?;
        let is_visible_for_all = request
            .is_visible_for_all
            .or_else(|| current.map(|c| c.is_visible_for_all))
            .unwrap_or(false);

        let channel = ServiceChannel {
            id: current.map(|c| c.id).unwrap_or_else(Uuid::new_v4),
            source: source_for(
                requested_source,
                self.auth.organization_id,
                current.and_then(|c| c.source.as_ref()),
            ),
            organization_id,
            channel_type,
            names: request.names,
            descriptions: request.descriptions,
            languages: request.languages,
            is_visible_for_all,
            publishing_status: request
                .publishing_status
                .as_deref()
                .and_then(PublishingStatus::parse)
                .unwrap_or(PublishingStatus::Draft),
            modified: Utc::now(),
        };

        let saved = services.channels.save(channel).await?;
        info!(
            channel_id = %saved.id,
            version = %self.state.contract.version,
            subject = %self.auth.subject,
            "Service channel saved"
        );

        let service_ids = services
            .connections
            .for_channel(saved.id)
            .await?
            .iter()
            .map(|c| c.service_id)
            .collect();
        Ok(ServiceChannelResponse::project(&saved, service_ids, self.state.shape()))
    }
}
