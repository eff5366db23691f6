//! Domain-service collaborator seams.
//!
//! Persistence and business rules live behind these traits. The HTTP layer
//! only sees [`DomainServices`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::entity::{
    CodeItem, Connection, Entity, FintoKind, GeneralDescription, Organization, Service,
    ServiceChannel, ServiceCollection,
};
use crate::shared::error::DomainResult;

/// Filters shared by every listing.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Modified at or after.
    pub date: Option<DateTime<Utc>>,
    /// Modified strictly before.
    pub date_before: Option<DateTime<Utc>>,
    /// List removed entities instead of visible ones.
    pub archived: bool,
    pub organization_ids: Option<Vec<Uuid>>,
}

impl ListFilter {
    pub fn matches<T: Entity>(&self, entity: &T) -> bool {
        let status = entity.publishing_status();
        let status_ok = if self.archived { status.is_removed() } else { status.is_visible() };
        if !status_ok {
            return false;
        }
        if let Some(date) = self.date {
            if entity.modified() < date {
                return false;
            }
        }
        if let Some(before) = self.date_before {
            if entity.modified() >= before {
                return false;
            }
        }
        match (&self.organization_ids, entity.organization_id()) {
            (Some(ids), Some(org)) => ids.contains(&org),
            (Some(_), None) => false,
            (None, _) => true,
        }
    }
}

/// 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize) * (self.page_size as usize)
    }
}

#[derive(Debug, Clone)]
pub struct DomainPage<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Storage of one entity kind.
#[async_trait]
pub trait EntityStore<T: Entity>: Send + Sync {
    async fn list(&self, filter: &ListFilter, page: PageRequest) -> DomainResult<DomainPage<T>>;

    async fn get(&self, id: Uuid) -> DomainResult<Option<T>>;

    async fn find_by_source_id(&self, source_id: &str, owner: Option<Uuid>) -> DomainResult<Option<T>>;

    /// Insert or overwrite by id.
    async fn save(&self, entity: T) -> DomainResult<T>;
}

/// Organization lookups used by reference resolution.
#[async_trait]
pub trait OrganizationLookup: Send + Sync {
    async fn find_by_business_code(&self, code: &str) -> DomainResult<Vec<Organization>>;

    async fn find_by_oid(&self, oid: &str) -> DomainResult<Option<Organization>>;

    /// All descendants of the given organizations, breadth first.
    async fn sub_organizations(&self, ids: &[Uuid]) -> DomainResult<Vec<Organization>>;
}

#[async_trait]
pub trait ConnectionService: Send + Sync {
    async fn for_service(&self, service_id: Uuid) -> DomainResult<Vec<Connection>>;

    async fn for_channel(&self, channel_id: Uuid) -> DomainResult<Vec<Connection>>;

    /// Upsert `connections` of one service; with `delete_all_missing` the
    /// service ends up with exactly these connections.
    async fn save_for_service(
        &self,
        service_id: Uuid,
        connections: Vec<Connection>,
        delete_all_missing: bool,
    ) -> DomainResult<Vec<Connection>>;

    async fn save_for_channel(
        &self,
        channel_id: Uuid,
        connections: Vec<Connection>,
        delete_all_missing: bool,
    ) -> DomainResult<Vec<Connection>>;
}

/// Reference code lists and taxonomy terms.
#[async_trait]
pub trait CodeService: Send + Sync {
    async fn language_codes(&self) -> DomainResult<Vec<CodeItem>>;

    async fn municipality_codes(&self) -> DomainResult<Vec<CodeItem>>;

    async fn country_codes(&self) -> DomainResult<Vec<CodeItem>>;

    async fn language_exists(&self, code: &str) -> DomainResult<bool>;

    async fn finto_term_exists(&self, kind: FintoKind, uri: &str) -> DomainResult<bool>;
}

/// Every collaborator the handlers reach.
#[derive(Clone)]
pub struct DomainServices {
    pub organizations: Arc<dyn EntityStore<Organization>>,
    pub organization_lookup: Arc<dyn OrganizationLookup>,
    pub services: Arc<dyn EntityStore<Service>>,
    pub channels: Arc<dyn EntityStore<ServiceChannel>>,
    pub collections: Arc<dyn EntityStore<ServiceCollection>>,
    pub general_descriptions: Arc<dyn EntityStore<GeneralDescription>>,
    pub connections: Arc<dyn ConnectionService>,
    pub codes: Arc<dyn CodeService>,
}
