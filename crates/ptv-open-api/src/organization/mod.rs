//! Organization Aggregate
//!
//! Organization listing, lookups by id, business code and oid, and writes.

pub mod api;
pub mod dto;
pub mod manager;
pub mod resolver;

pub use api::organization_router;
pub use dto::{OrganizationRequest, OrganizationResponse};
pub use manager::OrganizationManager;
pub use resolver::OrganizationQuery;
