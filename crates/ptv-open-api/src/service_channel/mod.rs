//! Service Channel Aggregate

pub mod api;
pub mod dto;
pub mod manager;

pub use api::service_channel_router;
pub use dto::{ServiceChannelRequest, ServiceChannelResponse};
pub use manager::ServiceChannelManager;
