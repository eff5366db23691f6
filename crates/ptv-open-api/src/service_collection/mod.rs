//! Service Collection Aggregate

pub mod api;
pub mod dto;
pub mod manager;

pub use api::service_collection_router;
pub use dto::{ServiceCollectionRequest, ServiceCollectionResponse};
pub use manager::ServiceCollectionManager;
