//! Domain Model
//!
//! Canonical entities, the domain-service traits and their in-memory
//! implementation.

pub mod entity;
pub mod memory;
pub mod seed;
pub mod services;

pub use entity::{
    ChannelType, CodeItem, Connection, Entity, FintoKind, FintoTerms, GeneralDescription,
    LocalizedText, Organization, PublishingStatus, Service, ServiceChannel, ServiceCollection,
    SourceId,
};
pub use memory::InMemoryRegistry;
pub use services::{
    CodeService, ConnectionService, DomainPage, DomainServices, EntityStore, ListFilter,
    OrganizationLookup, PageRequest,
};
