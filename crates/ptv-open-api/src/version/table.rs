//! Dispatch table: (entity kind, version) → contract.

use std::collections::HashMap;

use super::api_version::{ApiVersion, EntityKind};
use crate::auth::{AccessRight, AuthContext, Role};
use crate::shared::error::ApiError;

const WRITERS: &[Role] = &[Role::Eeva, Role::Pete];
const ADMINS: &[Role] = &[Role::Eeva];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRequirement {
    Anonymous,
    /// Any valid bearer token.
    Bearer,
    Roles {
        roles: &'static [Role],
        access_right: Option<AccessRight>,
    },
}

impl AccessRequirement {
    pub fn needs_token(self) -> bool {
        !matches!(self, AccessRequirement::Anonymous)
    }

    /// Role and access-right check for an authenticated caller.
    pub fn authorize(self, ctx: &AuthContext) -> Result<(), ApiError> {
        match self {
            AccessRequirement::Anonymous | AccessRequirement::Bearer => Ok(()),
            AccessRequirement::Roles { roles, access_right } => {
                if !ctx.has_role(roles) {
                    return Err(ApiError::forbidden(format!(
                        "User '{}' does not have a required role.",
                        ctx.subject
                    )));
                }
                if let Some(right) = access_right {
                    if !ctx.has_access_right(right) {
                        return Err(ApiError::forbidden(format!(
                            "User '{}' does not have access right {:?}.",
                            ctx.subject, right
                        )));
                    }
                }
                Ok(())
            }
        }
    }
}

/// How request bodies map to the canonical commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestShape {
    /// Extended-only fields are ignored.
    Standard,
    Extended,
}

/// How results are projected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// List items carry ids only.
    Legacy,
    /// List items carry names.
    Standard,
    /// Adds oid, parent, modified and relation ids.
    Extended,
}

impl ResponseShape {
    pub fn is_extended(self) -> bool {
        self == ResponseShape::Extended
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contract {
    pub kind: EntityKind,
    pub version: ApiVersion,
    pub read: AccessRequirement,
    pub write: AccessRequirement,
    pub request: RequestShape,
    pub response: ResponseShape,
}

impl Contract {
    /// Contract of a supported (kind, version), `None` otherwise.
    pub fn for_version(kind: EntityKind, version: ApiVersion) -> Option<Self> {
        if !kind.supports(version) {
            return None;
        }

        let n = version.number();
        let access_right = (n >= 9).then_some(AccessRight::OpenApiWrite);
        let write = match (kind, n) {
            (EntityKind::GeneralDescription, _) => AccessRequirement::Roles {
                roles: ADMINS,
                access_right,
            },
            (_, 6) => AccessRequirement::Bearer,
            _ => AccessRequirement::Roles {
                roles: WRITERS,
                access_right,
            },
        };

        Some(Contract {
            kind,
            version,
            read: AccessRequirement::Anonymous,
            write,
            request: if n >= 9 { RequestShape::Extended } else { RequestShape::Standard },
            response: match n {
                6 => ResponseShape::Legacy,
                7 | 8 => ResponseShape::Standard,
                _ => ResponseShape::Extended,
            },
        })
    }

    pub fn uses_extended_request(&self) -> bool {
        self.request == RequestShape::Extended
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Supported(Contract),
    NotSupported,
}

/// Every (kind, version) pair of the surface, resolved once at startup.
#[derive(Debug, Clone)]
pub struct DispatchTable {
    entries: HashMap<(EntityKind, ApiVersion), Contract>,
}

impl DispatchTable {
    pub fn new() -> Self {
        let entries = EntityKind::ALL
            .iter()
            .flat_map(|kind| ApiVersion::all().map(move |version| (*kind, version)))
            .filter_map(|(kind, version)| {
                Contract::for_version(kind, version).map(|contract| ((kind, version), contract))
            })
            .collect();
        Self { entries }
    }

    pub fn lookup(&self, kind: EntityKind, version: ApiVersion) -> Dispatch {
        match self.entries.get(&(kind, version)) {
            Some(contract) => Dispatch::Supported(*contract),
            None => Dispatch::NotSupported,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(n: u8) -> ApiVersion {
        ApiVersion::new(n).unwrap()
    }

    fn contract(kind: EntityKind, n: u8) -> Contract {
        match DispatchTable::new().lookup(kind, version(n)) {
            Dispatch::Supported(contract) => contract,
            Dispatch::NotSupported => panic!("{} {} should be supported", kind, n),
        }
    }

    fn ctx(role: Option<Role>, rights: Vec<AccessRight>) -> AuthContext {
        AuthContext {
            subject: "user".into(),
            role,
            organization_id: None,
            delegated_organizations: vec![],
            access_rights: rights,
        }
    }

    #[test]
    fn test_table_size() {
        // 7 kinds with v6..=v11 plus ServiceCollection v7..=v11
        assert_eq!(DispatchTable::new().len(), 7 * 6 + 5);
    }

    #[test]
    fn test_legacy_versions_not_supported() {
        let table = DispatchTable::new();
        for kind in EntityKind::ALL {
            for n in 2..=5 {
                assert_eq!(table.lookup(kind, version(n)), Dispatch::NotSupported);
            }
        }
        assert_eq!(table.lookup(EntityKind::ServiceCollection, version(6)), Dispatch::NotSupported);
    }

    #[test]
    fn test_shapes_by_version() {
        assert_eq!(contract(EntityKind::Service, 6).response, ResponseShape::Legacy);
        assert_eq!(contract(EntityKind::Service, 8).response, ResponseShape::Standard);
        assert_eq!(contract(EntityKind::Service, 9).response, ResponseShape::Extended);
        assert_eq!(contract(EntityKind::Service, 8).request, RequestShape::Standard);
        assert_eq!(contract(EntityKind::Service, 11).request, RequestShape::Extended);
    }

    #[test]
    fn test_write_access_narrows_with_version() {
        let pete = ctx(Some(Role::Pete), vec![]);
        let pete_with_right = ctx(Some(Role::Pete), vec![AccessRight::OpenApiWrite]);
        let shirley = ctx(Some(Role::Shirley), vec![AccessRight::OpenApiWrite]);

        let v6 = contract(EntityKind::Organization, 6).write;
        assert!(v6.authorize(&shirley).is_ok());

        let v8 = contract(EntityKind::Organization, 8).write;
        assert!(v8.authorize(&pete).is_ok());
        assert!(matches!(v8.authorize(&shirley), Err(ApiError::Forbidden(_))));

        let v9 = contract(EntityKind::Organization, 9).write;
        assert!(v9.authorize(&pete).is_err());
        assert!(v9.authorize(&pete_with_right).is_ok());
    }

    #[test]
    fn test_general_description_writes_need_eeva() {
        let pete = ctx(Some(Role::Pete), vec![AccessRight::OpenApiWrite]);
        let eeva = ctx(Some(Role::Eeva), vec![AccessRight::OpenApiWrite]);

        let v6 = contract(EntityKind::GeneralDescription, 6).write;
        assert!(v6.authorize(&pete).is_err());
        assert!(v6.authorize(&eeva).is_ok());

        let v9 = contract(EntityKind::GeneralDescription, 9).write;
        assert!(v9.authorize(&ctx(Some(Role::Eeva), vec![])).is_err());
        assert!(v9.authorize(&eeva).is_ok());
    }

    #[test]
    fn test_reads_are_anonymous() {
        for kind in EntityKind::ALL {
            assert_eq!(contract(kind, 11).read, AccessRequirement::Anonymous);
        }
    }
}
