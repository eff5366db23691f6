//! In-memory domain services.
//!
//! Backs the standalone server and the router tests. Entities live in
//! `DashMap`s keyed by id; connections and code lists sit behind
//! `parking_lot` locks.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use indexmap::IndexMap;
use parking_lot::RwLock;
use uuid::Uuid;

use super::entity::{
    CodeItem, Connection, Entity, FintoKind, GeneralDescription, Organization, Service,
    ServiceChannel, ServiceCollection,
};
use super::services::{
    CodeService, ConnectionService, DomainPage, DomainServices, EntityStore, ListFilter,
    OrganizationLookup, PageRequest,
};
use crate::shared::error::{DomainError, DomainResult};
use crate::shared::health_api::{HealthChecker, HealthStatus};

/// Shared switch that makes every store fail, for outage handling.
#[derive(Debug, Clone, Default)]
pub struct Availability(Arc<AtomicBool>);

impl Availability {
    pub fn set_unavailable(&self, unavailable: bool) {
        self.0.store(unavailable, Ordering::SeqCst);
    }

    pub fn is_available(&self) -> bool {
        !self.0.load(Ordering::SeqCst)
    }

    fn check(&self) -> DomainResult<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(DomainError::Unavailable("in-memory registry is offline".to_string()))
        }
    }
}

pub struct InMemoryStore<T: Entity> {
    entries: DashMap<Uuid, T>,
    availability: Availability,
}

impl<T: Entity> InMemoryStore<T> {
    pub fn new(availability: Availability) -> Self {
        Self { entries: DashMap::new(), availability }
    }

    pub fn insert(&self, entity: T) {
        self.entries.insert(entity.id(), entity);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn matching(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        let mut items: Vec<T> = self
            .entries
            .iter()
            .filter(|e| predicate(e.value()))
            .map(|e| e.value().clone())
            .collect();
        items.sort_by(|a, b| a.modified().cmp(&b.modified()).then(a.id().cmp(&b.id())));
        items
    }
}

#[async_trait]
impl<T: Entity> EntityStore<T> for InMemoryStore<T> {
    async fn list(&self, filter: &ListFilter, page: PageRequest) -> DomainResult<DomainPage<T>> {
        self.availability.check()?;
        let all = self.matching(|e| filter.matches(e));
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(page.offset())
            .take(page.page_size as usize)
            .collect();
        Ok(DomainPage { items, total })
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<T>> {
        self.availability.check()?;
        Ok(self.entries.get(&id).map(|e| e.value().clone()))
    }

    async fn find_by_source_id(&self, source_id: &str, owner: Option<Uuid>) -> DomainResult<Option<T>> {
        self.availability.check()?;
        Ok(self
            .entries
            .iter()
            .find(|e| {
                e.value()
                    .source()
                    .map(|s| s.value == source_id && s.owner == owner)
                    .unwrap_or(false)
            })
            .map(|e| e.value().clone()))
    }

    async fn save(&self, entity: T) -> DomainResult<T> {
        self.availability.check()?;
        self.entries.insert(entity.id(), entity.clone());
        Ok(entity)
    }
}

#[async_trait]
impl OrganizationLookup for InMemoryStore<Organization> {
    async fn find_by_business_code(&self, code: &str) -> DomainResult<Vec<Organization>> {
        self.availability.check()?;
        Ok(self.matching(|o| {
            o.publishing_status.is_visible() && o.business_code.as_deref() == Some(code)
        }))
    }

    async fn find_by_oid(&self, oid: &str) -> DomainResult<Option<Organization>> {
        self.availability.check()?;
        Ok(self
            .matching(|o| o.publishing_status.is_visible() && o.oid.as_deref() == Some(oid))
            .into_iter()
            .next())
    }

    async fn sub_organizations(&self, ids: &[Uuid]) -> DomainResult<Vec<Organization>> {
        self.availability.check()?;
        let mut seen: HashSet<Uuid> = ids.iter().copied().collect();
        let mut frontier: Vec<Uuid> = ids.to_vec();
        let mut result = Vec::new();

        while !frontier.is_empty() {
            let children = self.matching(|o| {
                o.publishing_status.is_visible()
                    && o.parent_id.map(|p| frontier.contains(&p)).unwrap_or(false)
                    && !seen.contains(&o.id)
            });
            frontier = children.iter().map(|o| o.id).collect();
            seen.extend(frontier.iter().copied());
            result.extend(children);
        }

        Ok(result)
    }
}

pub struct InMemoryConnections {
    relations: RwLock<IndexMap<(Uuid, Uuid), Connection>>,
    availability: Availability,
}

impl InMemoryConnections {
    pub fn new(availability: Availability) -> Self {
        Self { relations: RwLock::new(IndexMap::new()), availability }
    }

    fn collect(&self, predicate: impl Fn(&Connection) -> bool) -> Vec<Connection> {
        self.relations.read().values().filter(|c| predicate(c)).cloned().collect()
    }

    fn save_where(
        &self,
        belongs: impl Fn(&Connection) -> bool,
        connections: Vec<Connection>,
        delete_all_missing: bool,
    ) {
        let mut relations = self.relations.write();
        if delete_all_missing {
            let keep: HashSet<(Uuid, Uuid)> = connections.iter().map(Connection::key).collect();
            relations.retain(|key, c| !belongs(c) || keep.contains(key));
        }
        for connection in connections {
            relations.insert(connection.key(), connection);
        }
    }
}

#[async_trait]
impl ConnectionService for InMemoryConnections {
    async fn for_service(&self, service_id: Uuid) -> DomainResult<Vec<Connection>> {
        self.availability.check()?;
        Ok(self.collect(|c| c.service_id == service_id))
    }

    async fn for_channel(&self, channel_id: Uuid) -> DomainResult<Vec<Connection>> {
        self.availability.check()?;
        Ok(self.collect(|c| c.service_channel_id == channel_id))
    }

    async fn save_for_service(
        &self,
        service_id: Uuid,
        connections: Vec<Connection>,
        delete_all_missing: bool,
    ) -> DomainResult<Vec<Connection>> {
        self.availability.check()?;
        self.save_where(|c| c.service_id == service_id, connections, delete_all_missing);
        Ok(self.collect(|c| c.service_id == service_id))
    }

    async fn save_for_channel(
        &self,
        channel_id: Uuid,
        connections: Vec<Connection>,
        delete_all_missing: bool,
    ) -> DomainResult<Vec<Connection>> {
        self.availability.check()?;
        self.save_where(|c| c.service_channel_id == channel_id, connections, delete_all_missing);
        Ok(self.collect(|c| c.service_channel_id == channel_id))
    }
}

#[derive(Default)]
struct CodeLists {
    languages: Vec<CodeItem>,
    municipalities: Vec<CodeItem>,
    countries: Vec<CodeItem>,
    finto: HashMap<FintoKind, HashSet<String>>,
}

pub struct InMemoryCodes {
    lists: RwLock<CodeLists>,
    availability: Availability,
}

impl InMemoryCodes {
    pub fn new(availability: Availability) -> Self {
        Self { lists: RwLock::new(CodeLists::default()), availability }
    }

    pub fn add_language(&self, item: CodeItem) {
        self.lists.write().languages.push(item);
    }

    pub fn add_municipality(&self, item: CodeItem) {
        self.lists.write().municipalities.push(item);
    }

    pub fn add_country(&self, item: CodeItem) {
        self.lists.write().countries.push(item);
    }

    pub fn add_finto_term(&self, kind: FintoKind, uri: &str) {
        self.lists.write().finto.entry(kind).or_default().insert(uri.to_string());
    }
}

#[async_trait]
impl CodeService for InMemoryCodes {
    async fn language_codes(&self) -> DomainResult<Vec<CodeItem>> {
        self.availability.check()?;
        Ok(self.lists.read().languages.clone())
    }

    async fn municipality_codes(&self) -> DomainResult<Vec<CodeItem>> {
        self.availability.check()?;
        Ok(self.lists.read().municipalities.clone())
    }

    async fn country_codes(&self) -> DomainResult<Vec<CodeItem>> {
        self.availability.check()?;
        Ok(self.lists.read().countries.clone())
    }

    async fn language_exists(&self, code: &str) -> DomainResult<bool> {
        self.availability.check()?;
        Ok(self.lists.read().languages.iter().any(|l| l.code == code))
    }

    async fn finto_term_exists(&self, kind: FintoKind, uri: &str) -> DomainResult<bool> {
        self.availability.check()?;
        Ok(self
            .lists
            .read()
            .finto
            .get(&kind)
            .map(|terms| terms.contains(uri))
            .unwrap_or(false))
    }
}

/// All in-memory stores sharing one availability switch.
pub struct InMemoryRegistry {
    pub organizations: Arc<InMemoryStore<Organization>>,
    pub services: Arc<InMemoryStore<Service>>,
    pub channels: Arc<InMemoryStore<ServiceChannel>>,
    pub collections: Arc<InMemoryStore<ServiceCollection>>,
    pub general_descriptions: Arc<InMemoryStore<GeneralDescription>>,
    pub connections: Arc<InMemoryConnections>,
    pub codes: Arc<InMemoryCodes>,
    availability: Availability,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        let availability = Availability::default();
        Self {
            organizations: Arc::new(InMemoryStore::new(availability.clone())),
            services: Arc::new(InMemoryStore::new(availability.clone())),
            channels: Arc::new(InMemoryStore::new(availability.clone())),
            collections: Arc::new(InMemoryStore::new(availability.clone())),
            general_descriptions: Arc::new(InMemoryStore::new(availability.clone())),
            connections: Arc::new(InMemoryConnections::new(availability.clone())),
            codes: Arc::new(InMemoryCodes::new(availability.clone())),
            availability,
        }
    }

    pub fn availability(&self) -> &Availability {
        &self.availability
    }

    pub fn domain_services(&self) -> DomainServices {
        DomainServices {
            organizations: self.organizations.clone(),
            organization_lookup: self.organizations.clone(),
            services: self.services.clone(),
            channels: self.channels.clone(),
            collections: self.collections.clone(),
            general_descriptions: self.general_descriptions.clone(),
            connections: self.connections.clone(),
            codes: self.codes.clone(),
        }
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HealthChecker for InMemoryRegistry {
    fn name(&self) -> &str {
        "InMemoryRegistry"
    }

    async fn check(&self) -> HealthStatus {
        if self.availability.is_available() {
            HealthStatus::Ok
        } else {
            HealthStatus::Failed
        }
    }
}
