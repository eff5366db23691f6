//! Shared infrastructure: errors, request plumbing, middleware and probes.

pub mod api_common;
pub mod error;
pub mod health_api;
pub mod middleware;
pub mod state;

pub use api_common::{ListItem, ListQuery, PagedResult};
pub use error::{ApiError, DomainError, ErrorMessage, Result};
pub use health_api::{HealthAggregator, HealthChecker, HealthStatus};
pub use middleware::{AccessGate, Authenticated};
pub use state::{ApiState, VersionedState};
