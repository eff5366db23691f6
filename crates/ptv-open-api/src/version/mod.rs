//! Version Dispatch
//!
//! Versions are translation layers over one canonical model. The table picks
//! access requirements and request/response shapes per (kind, version);
//! retired versions get a uniform rejection.

pub mod api_version;
pub mod legacy;
pub mod table;

pub use api_version::{ApiVersion, EntityKind};
pub use legacy::{legacy_router, not_supported_message};
pub use table::{AccessRequirement, Contract, Dispatch, DispatchTable, RequestShape, ResponseShape};
