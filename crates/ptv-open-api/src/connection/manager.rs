//! Connection writes.
//!
//! Three managers share the reference checks: service → channels,
//! channel → services and the additive bulk add. Nested identifiers are
//! parsed before anything else and a malformed one aborts the request.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::dto::{
    ChannelConnectionsRequest, ChannelConnectionsResponse, ConnectionRequest, ConnectionResponse,
    ServiceConnectionsRequest, ServiceConnectionsResponse, EXTRA_TYPES,
};
use crate::auth::AuthContext;
use crate::domain::{Connection, DomainServices, LocalizedText, Service, ServiceChannel};
use crate::manager::checks::{check_localized, resolve_by_id, REQUIRED_MESSAGE};
use crate::manager::{EntityManager, Target};
use crate::shared::error::{ApiError, Result};
use crate::shared::state::VersionedState;
use crate::validation::{EnumValidator, GuidParser, ParameterValidator, ValidationErrors};

/// Required nested identifier; malformed text is an `Err`.
fn nested_id(value: Option<&str>, field: &str, errors: &mut ValidationErrors) -> Result<Option<Uuid>> {
    match value.filter(|v| !v.trim().is_empty()) {
        None => {
            errors.add(field, REQUIRED_MESSAGE);
            Ok(None)
        }
        Some(value) => GuidParser::parse(value).map(Some),
    }
}

fn channel_usable(auth: &AuthContext, channel: &ServiceChannel) -> bool {
    channel.is_visible_for_all || auth.can_see_organization(channel.organization_id)
}

async fn check_channel(
    services: &DomainServices,
    auth: &AuthContext,
    field: &str,
    id: Uuid,
    errors: &mut ValidationErrors,
) -> Result<()> {
    match services.channels.get(id).await? {
        Some(channel) if channel.publishing_status.allows_connection_update() => {
            if !channel_usable(auth, &channel) {
                errors.add(field, format!("User has no rights to use service channel '{}'.", id));
            }
        }
        Some(channel) => errors.add(
            field,
            format!(
                "Service channel '{}' with publishing status {} cannot be connected.",
                id, channel.publishing_status
            ),
        ),
        None => errors.add(field, format!("Service channel with id '{}' not found.", id)),
    }
    Ok(())
}

async fn check_service(
    services: &DomainServices,
    auth: &AuthContext,
    field: &str,
    id: Uuid,
    errors: &mut ValidationErrors,
) -> Result<()> {
    match services.services.get(id).await? {
        Some(service) if service.publishing_status.allows_connection_update() => {
            if !auth.can_see_organization(service.organization_id) {
                errors.add(field, format!("User has no rights to use service '{}'.", id));
            }
        }
        Some(service) => errors.add(
            field,
            format!(
                "Service '{}' with publishing status {} cannot be connected.",
                id, service.publishing_status
            ),
        ),
        None => errors.add(field, format!("Service with id '{}' not found.", id)),
    }
    Ok(())
}

fn check_extra_types(field: &str, extra_types: &[String], errors: &mut ValidationErrors) {
    for (i, extra_type) in extra_types.iter().enumerate() {
        let property = format!("{}[{}]", field, i);
        EnumValidator::new(Some(extra_type), &property, &EXTRA_TYPES).validate(errors);
    }
}

/// Connection to store. Without extended fields the stored extra types
/// are kept.
fn connection(
    service_id: Uuid,
    service_channel_id: Uuid,
    extra_types: Vec<String>,
    description: Vec<LocalizedText>,
    extended: bool,
    existing: &HashMap<(Uuid, Uuid), Connection>,
) -> Connection {
    let extra_types = if extended {
        extra_types
    } else {
        existing
            .get(&(service_id, service_channel_id))
            .map(|c| c.extra_types.clone())
            .unwrap_or_default()
    };
    Connection { service_id, service_channel_id, extra_types, description, modified: Utc::now() }
}

fn by_key(connections: Vec<Connection>) -> HashMap<(Uuid, Uuid), Connection> {
    connections.into_iter().map(|c| (c.key(), c)).collect()
}

/// `PUT /Connection/serviceId/{serviceId}`
pub struct ServiceConnectionManager<'a> {
    state: &'a VersionedState,
    auth: &'a AuthContext,
    service_id: Uuid,
}

impl<'a> ServiceConnectionManager<'a> {
    pub fn new(state: &'a VersionedState, auth: &'a AuthContext, service_id: Uuid) -> Self {
        Self { state, auth, service_id }
    }
}

#[async_trait]
impl EntityManager for ServiceConnectionManager<'_> {
    type Request = ServiceConnectionsRequest;
    type Current = Service;
    type Output = ServiceConnectionsResponse;

    fn normalize(&self, request: ServiceConnectionsRequest) -> ServiceConnectionsRequest {
        request.for_shape(self.state.contract.request)
    }

    async fn validate(&self, request: &ServiceConnectionsRequest, errors: &mut ValidationErrors) -> Result<()> {
        let services = self.state.services();
        let mut channel_ids = Vec::with_capacity(request.channel_relations.len());
        for (i, relation) in request.channel_relations.iter().enumerate() {
            let field = format!("channelRelations[{}].serviceChannelId", i);
            channel_ids.push(nested_id(relation.service_channel_id.as_deref(), &field, errors)?);
        }

        for (i, (relation, id)) in request.channel_relations.iter().zip(channel_ids).enumerate() {
            if let Some(id) = id {
                let field = format!("channelRelations[{}].serviceChannelId", i);
                check_channel(services, self.auth, &field, id, errors).await?;
            }
            check_extra_types(&format!("channelRelations[{}].extraTypes", i), &relation.extra_types, errors);
            let field = format!("channelRelations[{}].description", i);
            check_localized(services, &field, &relation.description, false, errors).await?;
        }
        Ok(())
    }

    async fn resolve_target(&self) -> Result<Target<Service>> {
        resolve_by_id(self.state.services().services.as_ref(), self.service_id)
            .await
            .map(Target::Existing)
    }

    async fn check_current(
        &self,
        _request: &ServiceConnectionsRequest,
        current: &Service,
        errors: &mut ValidationErrors,
    ) -> Result<()> {
        if !current.publishing_status.allows_connection_update() {
            errors.add(
                "serviceId",
                format!(
                    "Connections of a service with publishing status {} cannot be updated.",
                    current.publishing_status
                ),
            );
        } else if !self.auth.can_see_organization(current.organization_id) {
            return Err(ApiError::forbidden(format!(
                "User has no rights to update connections of service '{}'.",
                current.id
            )));
        }
        Ok(())
    }

    async fn execute(
        &self,
        request: ServiceConnectionsRequest,
        _target: Target<Service>,
    ) -> Result<ServiceConnectionsResponse> {
        let services = self.state.services();
        let extended = self.state.contract.uses_extended_request();
        let existing = by_key(services.connections.for_service(self.service_id).await?);

        let mut connections = Vec::with_capacity(request.channel_relations.len());
        for relation in request.channel_relations {
            let channel_id = GuidParser::parse_optional(relation.service_channel_id.as_deref())?
                .ok_or_else(|| ApiError::Internal("serviceChannelId missing after validation".to_string()))?;
            connections.push(connection(
                self.service_id,
                channel_id,
                relation.extra_types,
                relation.description,
                extended,
                &existing,
            ));
        }

        let saved = services
            .connections
            .save_for_service(self.service_id, connections, request.delete_all_channel_relations)
            .await?;
        info!(
            service_id = %self.service_id,
            connections = saved.len(),
            delete_all = request.delete_all_channel_relations,
            "Service connections saved"
        );
        Ok(ServiceConnectionsResponse {
            service_id: self.service_id,
            service_channels: ConnectionResponse::project_all(&saved, self.state.shape()),
        })
    }
}

/// `PUT /Connection/serviceChannelId/{serviceChannelId}`
pub struct ChannelConnectionManager<'a> {
    state: &'a VersionedState,
    auth: &'a AuthContext,
    channel_id: Uuid,
}

impl<'a> ChannelConnectionManager<'a> {
    pub fn new(state: &'a VersionedState, auth: &'a AuthContext, channel_id: Uuid) -> Self {
        Self { state, auth, channel_id }
    }
}

#[async_trait]
impl EntityManager for ChannelConnectionManager<'_> {
    type Request = ChannelConnectionsRequest;
    type Current = ServiceChannel;
    type Output = ChannelConnectionsResponse;

    fn normalize(&self, request: ChannelConnectionsRequest) -> ChannelConnectionsRequest {
        request.for_shape(self.state.contract.request)
    }

    async fn validate(&self, request: &ChannelConnectionsRequest, errors: &mut ValidationErrors) -> Result<()> {
        let services = self.state.services();
        let mut service_ids = Vec::with_capacity(request.service_relations.len());
        for (i, relation) in request.service_relations.iter().enumerate() {
            let field = format!("serviceRelations[{}].serviceId", i);
            service_ids.push(nested_id(relation.service_id.as_deref(), &field, errors)?);
        }

        for (i, (relation, id)) in request.service_relations.iter().zip(service_ids).enumerate() {
            if let Some(id) = id {
                let field = format!("serviceRelations[{}].serviceId", i);
                check_service(services, self.auth, &field, id, errors).await?;
            }
            check_extra_types(&format!("serviceRelations[{}].extraTypes", i), &relation.extra_types, errors);
            let field = format!("serviceRelations[{}].description", i);
            check_localized(services, &field, &relation.description, false, errors).await?;
        }
        Ok(())
    }

    async fn resolve_target(&self) -> Result<Target<ServiceChannel>> {
        resolve_by_id(self.state.services().channels.as_ref(), self.channel_id)
            .await
            .map(Target::Existing)
    }

    async fn check_current(
        &self,
        _request: &ChannelConnectionsRequest,
        current: &ServiceChannel,
        errors: &mut ValidationErrors,
    ) -> Result<()> {
        if !current.publishing_status.allows_connection_update() {
            errors.add(
                "serviceChannelId",
                format!(
                    "Connections of a service channel with publishing status {} cannot be updated.",
                    current.publishing_status
                ),
            );
        } else if !self.auth.can_see_organization(current.organization_id) {
            return Err(ApiError::forbidden(format!(
                "User has no rights to update connections of service channel '{}'.",
                current.id
            )));
        }
        Ok(())
    }

    async fn execute(
        &self,
        request: ChannelConnectionsRequest,
        _target: Target<ServiceChannel>,
    ) -> Result<ChannelConnectionsResponse> {
        let services = self.state.services();
        let extended = self.state.contract.uses_extended_request();
        let existing = by_key(services.connections.for_channel(self.channel_id).await?);

        let mut connections = Vec::with_capacity(request.service_relations.len());
        for relation in request.service_relations {
            let service_id = GuidParser::parse_optional(relation.service_id.as_deref())?
                .ok_or_else(|| ApiError::Internal("serviceId missing after validation".to_string()))?;
            connections.push(connection(
                service_id,
                self.channel_id,
                relation.extra_types,
                relation.description,
                extended,
                &existing,
            ));
        }

        let saved = services
            .connections
            .save_for_channel(self.channel_id, connections, request.delete_all_service_relations)
            .await?;
        info!(
            channel_id = %self.channel_id,
            connections = saved.len(),
            delete_all = request.delete_all_service_relations,
            "Service channel connections saved"
        );
        Ok(ChannelConnectionsResponse {
            service_channel_id: self.channel_id,
            services: ConnectionResponse::project_all(&saved, self.state.shape()),
        })
    }
}

/// `POST /Connection`: additive, grouped per service.
pub struct BulkConnectionManager<'a> {
    state: &'a VersionedState,
    auth: &'a AuthContext,
}

impl<'a> BulkConnectionManager<'a> {
    pub fn new(state: &'a VersionedState, auth: &'a AuthContext) -> Self {
        Self { state, auth }
    }
}

#[async_trait]
impl EntityManager for BulkConnectionManager<'_> {
    type Request = Vec<ConnectionRequest>;
    type Current = ();
    type Output = Vec<ConnectionResponse>;

    fn normalize(&self, mut request: Vec<ConnectionRequest>) -> Vec<ConnectionRequest> {
        if !self.state.contract.uses_extended_request() {
            request.iter_mut().for_each(|r| r.extra_types.clear());
        }
        request
    }

    async fn validate(&self, request: &Vec<ConnectionRequest>, errors: &mut ValidationErrors) -> Result<()> {
        let services = self.state.services();
        let mut ids = Vec::with_capacity(request.len());
        for (i, entry) in request.iter().enumerate() {
            let service_id = nested_id(entry.service_id.as_deref(), &format!("[{}].serviceId", i), errors)?;
            let channel_id =
                nested_id(entry.service_channel_id.as_deref(), &format!("[{}].serviceChannelId", i), errors)?;
            ids.push((service_id, channel_id));
        }

        for (i, (entry, (service_id, channel_id))) in request.iter().zip(ids).enumerate() {
            if let Some(id) = service_id {
                check_service(services, self.auth, &format!("[{}].serviceId", i), id, errors).await?;
            }
            if let Some(id) = channel_id {
                check_channel(services, self.auth, &format!("[{}].serviceChannelId", i), id, errors).await?;
            }
            check_extra_types(&format!("[{}].extraTypes", i), &entry.extra_types, errors);
            check_localized(services, &format!("[{}].description", i), &entry.description, false, errors).await?;
        }
        Ok(())
    }

    async fn resolve_target(&self) -> Result<Target<()>> {
        Ok(Target::New)
    }

    async fn execute(&self, request: Vec<ConnectionRequest>, _target: Target<()>) -> Result<Vec<ConnectionResponse>> {
        let services = self.state.services();
        let extended = self.state.contract.uses_extended_request();

        let mut grouped: HashMap<Uuid, Vec<(Uuid, ConnectionRequest)>> = HashMap::new();
        let mut order = Vec::new();
        for entry in request {
            let service_id = GuidParser::parse_optional(entry.service_id.as_deref())?;
            let channel_id = GuidParser::parse_optional(entry.service_channel_id.as_deref())?;
            let (Some(service_id), Some(channel_id)) = (service_id, channel_id) else {
                return Err(ApiError::Internal("connection ids missing after validation".to_string()));
            };
            if !grouped.contains_key(&service_id) {
                order.push(service_id);
            }
            grouped.entry(service_id).or_default().push((channel_id, entry));
        }

        let mut saved = Vec::new();
        for service_id in order {
            let entries = grouped.remove(&service_id).unwrap_or_default();
            let existing = by_key(services.connections.for_service(service_id).await?);
            let connections = entries
                .into_iter()
                .map(|(channel_id, entry)| {
                    connection(service_id, channel_id, entry.extra_types, entry.description, extended, &existing)
                })
                .collect::<Vec<_>>();
            let keys: Vec<_> = connections.iter().map(Connection::key).collect();

            let stored = services.connections.save_for_service(service_id, connections, false).await?;
            saved.extend(stored.into_iter().filter(|c| keys.contains(&c.key())));
        }

        info!(connections = saved.len(), "Connections added");
        Ok(ConnectionResponse::project_all(&saved, self.state.shape()))
    }
}
