//! PTV Open API
//!
//! Versioned REST surface of the service registry:
//! - Organizations, services, service channels, service collections and
//!   general descriptions (v6 to v11, collections from v7)
//! - Service/channel connections
//! - Reference code lists and cross-kind listing
//! - Liveness and readiness probes
//!
//! ## Module Organization (Aggregate-based)
//!
//! Each aggregate contains:
//! - `dto` - Versioned request/response contracts
//! - `manager` - Add/save orchestration
//! - `api` - REST endpoints
//!
//! Requests are routed through [`version::DispatchTable`], which picks the
//! access requirement and shapes per (kind, version).

// Entity aggregates
pub mod organization;
pub mod service;
pub mod service_channel;
pub mod service_collection;
pub mod general_description;
pub mod connection;

// Read-only surfaces
pub mod code_list;
pub mod common;

// Request pipeline
pub mod auth;
pub mod manager;
pub mod validation;
pub mod version;

// Domain collaborators
pub mod domain;

// Shared infrastructure
pub mod router;
pub mod shared;

pub use router::build_router;
pub use shared::error::{ApiError, DomainError, Result};
pub use shared::health_api::{HealthAggregator, HealthChecker, HealthStatus};
pub use shared::state::{ApiState, VersionedState};

pub use auth::{AuthContext, TokenValidator};
pub use domain::{seed, DomainServices, InMemoryRegistry};
pub use validation::ValidationErrors;
pub use version::{ApiVersion, EntityKind};
