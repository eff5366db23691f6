//! Authentication
//!
//! Bearer token validation and the resolved caller context.

pub mod context;
pub mod token;

pub use context::{AccessRight, AuthContext, Role};
pub use token::{extract_bearer_token, AccessTokenClaims, TokenValidator};
