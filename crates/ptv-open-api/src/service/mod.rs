//! Service Aggregate

pub mod api;
pub mod dto;
pub mod manager;

pub use api::service_router;
pub use dto::{ServiceRequest, ServiceResponse};
pub use manager::ServiceManager;
