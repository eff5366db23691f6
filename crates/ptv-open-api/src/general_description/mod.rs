//! General Description Aggregate

pub mod api;
pub mod dto;
pub mod manager;

pub use api::general_description_router;
pub use dto::{GeneralDescriptionRequest, GeneralDescriptionResponse};
pub use manager::GeneralDescriptionManager;
