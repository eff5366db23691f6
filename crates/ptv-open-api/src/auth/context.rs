//! Caller identity resolved from a validated token.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::token::AccessTokenClaims;

/// Roles carried in the `role` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Registry administrator, sees every organization.
    Eeva,
    Pete,
    Shirley,
}

impl Role {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Eeva" => Some(Self::Eeva),
            "Pete" => Some(Self::Pete),
            "Shirley" => Some(Self::Shirley),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessRight {
    OpenApiWrite,
}

impl AccessRight {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "OpenApiWrite" => Some(Self::OpenApiWrite),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthContext {
    pub subject: String,
    pub role: Option<Role>,
    pub organization_id: Option<Uuid>,
    pub delegated_organizations: Vec<Uuid>,
    pub access_rights: Vec<AccessRight>,
}

impl AuthContext {
    /// Unknown roles, rights and unparsable organization ids are dropped.
    pub fn from_claims(claims: &AccessTokenClaims) -> Self {
        Self {
            subject: claims.sub.clone(),
            role: claims.role.as_deref().and_then(Role::parse),
            organization_id: claims
                .organization
                .as_deref()
                .and_then(|o| Uuid::try_parse(o).ok()),
            delegated_organizations: claims
                .delegated_organizations
                .iter()
                .filter_map(|o| Uuid::try_parse(o).ok())
                .collect(),
            access_rights: claims
                .access_rights
                .iter()
                .filter_map(|r| AccessRight::parse(r))
                .collect(),
        }
    }

    pub fn has_role(&self, roles: &[Role]) -> bool {
        self.role.map(|r| roles.contains(&r)).unwrap_or(false)
    }

    pub fn has_access_right(&self, right: AccessRight) -> bool {
        self.access_rights.contains(&right)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Eeva)
    }

    pub fn can_see_organization(&self, organization_id: Uuid) -> bool {
        self.is_admin()
            || self.organization_id == Some(organization_id)
            || self.delegated_organizations.contains(&organization_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(role: Option<Role>, organization: Option<Uuid>, delegated: Vec<Uuid>) -> AuthContext {
        AuthContext {
            subject: "user".into(),
            role,
            organization_id: organization,
            delegated_organizations: delegated,
            access_rights: vec![],
        }
    }

    #[test]
    fn test_visibility() {
        let own = Uuid::new_v4();
        let delegated = Uuid::new_v4();
        let other = Uuid::new_v4();

        let pete = context(Some(Role::Pete), Some(own), vec![delegated]);
        assert!(pete.can_see_organization(own));
        assert!(pete.can_see_organization(delegated));
        assert!(!pete.can_see_organization(other));

        let eeva = context(Some(Role::Eeva), None, vec![]);
        assert!(eeva.can_see_organization(other));
    }

    #[test]
    fn test_from_claims_drops_unknown_values() {
        let organization = Uuid::new_v4();
        let claims = AccessTokenClaims {
            sub: "s".into(),
            iss: "i".into(),
            aud: "a".into(),
            exp: 0,
            iat: 0,
            role: Some("Root".into()),
            organization: Some(organization.to_string()),
            delegated_organizations: vec!["nope".into()],
            access_rights: vec!["OpenApiWrite".into(), "Other".into()],
        };

        let ctx = AuthContext::from_claims(&claims);
        assert_eq!(ctx.role, None);
        assert_eq!(ctx.organization_id, Some(organization));
        assert!(ctx.delegated_organizations.is_empty());
        assert_eq!(ctx.access_rights, vec![AccessRight::OpenApiWrite]);
    }
}
