//! Service / Service Channel Connections

pub mod api;
pub mod dto;
pub mod manager;

pub use api::{connection_router, visible_channel_connections, visible_service_connections};
pub use dto::{ConnectionResponse, ServiceConnectionsRequest, ServiceConnectionsResponse};
pub use manager::{BulkConnectionManager, ChannelConnectionManager, ServiceConnectionManager};
