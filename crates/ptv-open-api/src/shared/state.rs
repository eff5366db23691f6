//! Router state.

use std::sync::Arc;

use crate::auth::TokenValidator;
use crate::domain::DomainServices;
use crate::shared::middleware::AccessGate;
use crate::validation::patterns::{Pattern, OID, STRICT_OID};
use crate::version::{Contract, ResponseShape};

/// Shared by every versioned router.
#[derive(Clone)]
pub struct ApiState {
    pub services: DomainServices,
    pub tokens: Arc<TokenValidator>,
    /// Effective page size, already defaulted.
    pub page_size: u32,
    pub documentation_url: Arc<str>,
}

/// State of one (kind, version) router.
#[derive(Clone)]
pub struct VersionedState {
    pub api: ApiState,
    pub contract: Contract,
}

impl VersionedState {
    pub fn new(api: ApiState, contract: Contract) -> Self {
        Self { api, contract }
    }

    pub fn services(&self) -> &DomainServices {
        &self.api.services
    }

    pub fn shape(&self) -> ResponseShape {
        self.contract.response
    }

    pub fn page_size(&self) -> u32 {
        self.api.page_size
    }

    pub fn read_gate(&self) -> AccessGate {
        AccessGate::new(self.api.tokens.clone(), self.contract.read)
    }

    pub fn write_gate(&self) -> AccessGate {
        AccessGate::new(self.api.tokens.clone(), self.contract.write)
    }

    /// Oid pattern of the version; from v9 a dot is required.
    pub fn oid_pattern(&self) -> &'static Pattern {
        if self.contract.version.number() >= 9 {
            &STRICT_OID
        } else {
            &OID
        }
    }
}
