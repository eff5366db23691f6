//! General description add/save.

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::dto::{GeneralDescriptionRequest, GeneralDescriptionResponse};
use crate::auth::AuthContext;
use crate::domain::{GeneralDescription, PublishingStatus};
use crate::manager::checks::{
    check_finto_terms, check_languages, check_localized, check_publishing_status, check_transition,
    resolve_by_id,
};
use crate::manager::{EntityManager, Target, WriteKey};
use crate::shared::error::Result;
use crate::shared::state::VersionedState;
use crate::validation::ValidationErrors;

pub struct GeneralDescriptionManager<'a> {
    state: &'a VersionedState,
    auth: &'a AuthContext,
    key: WriteKey,
}

impl<'a> GeneralDescriptionManager<'a> {
    pub fn new(state: &'a VersionedState, auth: &'a AuthContext, key: WriteKey) -> Self {
        Self { state, auth, key }
    }
}

#[async_trait]
impl EntityManager for GeneralDescriptionManager<'_> {
    type Request = GeneralDescriptionRequest;
    type Current = GeneralDescription;
    type Output = GeneralDescriptionResponse;

    async fn validate(&self, request: &GeneralDescriptionRequest, errors: &mut ValidationErrors) -> Result<()> {
        let services = self.state.services();
        check_localized(services, "names", &request.names, true, errors).await?;
        check_localized(services, "descriptions", &request.descriptions, false, errors).await?;
        check_languages(services, "languages", &request.languages, errors).await?;
        check_finto_terms(services, &request.finto, errors).await?;
        check_publishing_status(request.publishing_status.as_deref(), errors);
        Ok(())
    }

    async fn resolve_target(&self) -> Result<Target<GeneralDescription>> {
        match &self.key {
            WriteKey::Id(id) => resolve_by_id(self.state.services().general_descriptions.as_ref(), *id)
                .await
                .map(Target::Existing),
            _ => Ok(Target::New),
        }
    }

    async fn check_current(
        &self,
        request: &GeneralDescriptionRequest,
        current: &GeneralDescription,
        errors: &mut ValidationErrors,
    ) -> Result<()> {
        check_transition(current.publishing_status, request.publishing_status.as_deref(), errors);
        Ok(())
    }

    async fn execute(
        &self,
        request: GeneralDescriptionRequest,
        target: Target<GeneralDescription>,
    ) -> Result<GeneralDescriptionResponse> {
        let description = GeneralDescription {
            id: target.current().map(|c| c.id).unwrap_or_else(Uuid::new_v4),
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

        let saved = self.state.services().general_descriptions.save(description).await?;
        info!(
            general_description_id = %saved.id,
            subject = %self.auth.subject,
            "General description saved"
        );
        Ok(GeneralDescriptionResponse::project(&saved, self.state.shape()))
    }
}
