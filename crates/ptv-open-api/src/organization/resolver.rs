//! Organization reference resolution.
//!
//! Listing endpoints accept an organization as exactly one of
//! `organizationId`, `code` (business code) or `oid`. Shape problems
//! accumulate as field errors. Well-formed references that match nothing
//! are a 404. A malformed `organizationId` aborts the request.

use serde::Deserialize;

use crate::domain::{DomainServices, ListFilter, Organization};
use crate::shared::api_common::{ensure_valid, parse_page, ListParams};
use crate::shared::error::{ApiError, Result};
use crate::validation::patterns::{Pattern, BUSINESS_CODE};
use crate::validation::{GuidParser, ParameterValidator, RegExValidator, ValidationErrors};

pub const ONE_REQUIRED_MESSAGE: &str = "One of the parameters organizationId, code or oid is required.";
pub const ONLY_ONE_MESSAGE: &str = "Only one of the parameters organizationId, code or oid is allowed at a time.";

/// `?organizationId&code&oid&page`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationQuery {
    pub organization_id: Option<String>,
    pub code: Option<String>,
    pub oid: Option<String>,
    pub page: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// `Ok(None)` means no filter: nothing given (and not required) or a field
/// error was recorded.
pub async fn resolve(
    services: &DomainServices,
    organization_id: Option<&str>,
    code: Option<&str>,
    oid: Option<&str>,
    one_required: bool,
    oid_pattern: &Pattern,
    errors: &mut ValidationErrors,
) -> Result<Option<Vec<Organization>>> {
    let organization_id = non_empty(organization_id);
    let code = non_empty(code);
    let oid = non_empty(oid);

    let given = [organization_id.is_some(), code.is_some(), oid.is_some()]
        .iter()
        .filter(|g| **g)
        .count();

    if given == 0 {
        if one_required {
            errors.add("organizationId", ONE_REQUIRED_MESSAGE);
        }
        return Ok(None);
    }
    if given > 1 {
        let field = if code.is_some() { "code" } else { "oid" };
        errors.add(field, ONLY_ONE_MESSAGE);
        return Ok(None);
    }

    if let Some(id) = organization_id {
        let uuid = GuidParser::parse(id)?;
        let organization = services
            .organizations
            .get(uuid)
            .await?
            .filter(|o| o.publishing_status.is_visible())
            .ok_or_else(|| ApiError::not_found(format!("Organization with id '{}' not found.", id)))?;
        return Ok(Some(vec![organization]));
    }

    if let Some(code) = code {
        let before = errors.len();
        RegExValidator::new(Some(code), "code", &BUSINESS_CODE).validate(errors);
        if errors.len() != before {
            return Ok(None);
        }
        let organizations = services.organization_lookup.find_by_business_code(code).await?;
        if organizations.is_empty() {
            return Err(ApiError::not_found(format!(
                "Organizations with code '{}' not found.",
                code
            )));
        }
        return Ok(Some(organizations));
    }

    if let Some(oid) = oid {
        let before = errors.len();
        RegExValidator::new(Some(oid), "oid", oid_pattern).validate(errors);
        if errors.len() != before {
            return Ok(None);
        }
        return match services.organization_lookup.find_by_oid(oid).await? {
            Some(organization) => Ok(Some(vec![organization])),
            None => Err(ApiError::not_found(format!("Organization with oid '{}' not found.", oid))),
        };
    }

    Ok(None)
}

impl OrganizationQuery {
    /// List parameters scoped to the one required organization reference.
    pub async fn scope(
        &self,
        services: &DomainServices,
        oid_pattern: &Pattern,
    ) -> Result<ListParams> {
        let mut errors = ValidationErrors::new();
        let page = parse_page(self.page.as_deref(), &mut errors);
        let resolved = resolve(
            services,
            self.organization_id.as_deref(),
            self.code.as_deref(),
            self.oid.as_deref(),
            true,
            oid_pattern,
            &mut errors,
        )
        .await?;
        ensure_valid(errors)?;

        Ok(ListParams {
            filter: ListFilter {
                organization_ids: Some(resolved.unwrap_or_default().iter().map(|o| o.id).collect()),
                ..ListFilter::default()
            },
            page,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InMemoryRegistry, LocalizedText, PublishingStatus};
    use crate::validation::patterns::{OID, STRICT_OID};
    use chrono::Utc;
    use uuid::Uuid;

    fn organization(code: &str, oid: &str) -> Organization {
        Organization {
            id: Uuid::new_v4(),
            source: None,
            parent_id: None,
            business_code: Some(code.into()),
            oid: Some(oid.into()),
            organization_type: None,
            names: vec![LocalizedText::new("fi", "Org")],
            descriptions: vec![],
            publishing_status: PublishingStatus::Published,
            modified: Utc::now(),
        }
    }

    async fn run(
        registry: &InMemoryRegistry,
        id: Option<&str>,
        code: Option<&str>,
        oid: Option<&str>,
        one_required: bool,
    ) -> (Result<Option<Vec<Organization>>>, ValidationErrors) {
        let mut errors = ValidationErrors::new();
        let services = registry.domain_services();
        let result = resolve(&services, id, code, oid, one_required, &OID, &mut errors).await;
        (result, errors)
    }

    #[tokio::test]
    async fn test_exactly_one_resolves_without_errors() {
        let registry = InMemoryRegistry::new();
        let org = organization("1234567-8", "1.2.246.1");
        registry.organizations.insert(org.clone());
        let id = org.id.to_string();

        for (i, c, o) in [
            (Some(id.as_str()), None, None),
            (None, Some("1234567-8"), None),
            (None, None, Some("1.2.246.1")),
        ] {
            let (result, errors) = run(&registry, i, c, o, true).await;
            assert!(errors.is_empty());
            let ids: Vec<Uuid> = result.unwrap().unwrap().iter().map(|o| o.id).collect();
            assert_eq!(ids, vec![org.id]);
        }
    }

    #[tokio::test]
    async fn test_none_given() {
        let registry = InMemoryRegistry::new();

        let (result, errors) = run(&registry, None, Some(""), None, true).await;
        assert!(result.unwrap().is_none());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("organizationId").unwrap(), [ONE_REQUIRED_MESSAGE]);

        let (result, errors) = run(&registry, None, None, None, false).await;
        assert!(result.unwrap().is_none());
        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn test_more_than_one_keyed_to_first_other_field() {
        let registry = InMemoryRegistry::new();
        let id = Uuid::new_v4().to_string();
        let id = Some(id.as_str());

        let cases = [
            (id, Some("1234567-8"), None, "code"),
            (id, None, Some("1.2"), "oid"),
            (None, Some("1234567-8"), Some("1.2"), "code"),
            (id, Some("1234567-8"), Some("1.2"), "code"),
        ];
        for (i, c, o, field) in cases {
            let (result, errors) = run(&registry, i, c, o, false).await;
            assert!(result.unwrap().is_none());
            assert_eq!(errors.len(), 1);
            assert_eq!(errors.get(field).unwrap(), [ONLY_ONE_MESSAGE]);
        }
    }

    #[tokio::test]
    async fn test_malformed_id_raises() {
        let registry = InMemoryRegistry::new();
        let (result, errors) = run(&registry, Some("not-a-guid"), None, None, true).await;
        assert!(matches!(result, Err(ApiError::InvalidIdentifier(_))));
        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn test_not_found_messages() {
        let registry = InMemoryRegistry::new();
        let id = Uuid::new_v4().to_string();

        let (result, _) = run(&registry, Some(&id), None, None, true).await;
        match result {
            Err(ApiError::NotFound(m)) => assert_eq!(m, format!("Organization with id '{}' not found.", id)),
            _ => panic!("expected not found"),
        }

        let (result, _) = run(&registry, None, Some("1234567-8"), None, true).await;
        match result {
            Err(ApiError::NotFound(m)) => assert_eq!(m, "Organizations with code '1234567-8' not found."),
            _ => panic!("expected not found"),
        }

        let (result, _) = run(&registry, None, None, Some("1.2.3"), true).await;
        match result {
            Err(ApiError::NotFound(m)) => assert_eq!(m, "Organization with oid '1.2.3' not found."),
            _ => panic!("expected not found"),
        }
    }

    #[tokio::test]
    async fn test_malformed_code_and_oid_are_field_errors() {
        let registry = InMemoryRegistry::new();

        let (result, errors) = run(&registry, None, Some("12-34"), None, true).await;
        assert!(result.unwrap().is_none());
        assert!(errors.contains_key("code"));

        let mut errors = ValidationErrors::new();
        let services = registry.domain_services();
        let result = resolve(&services, None, None, Some("nodots"), true, &STRICT_OID, &mut errors).await;
        assert!(result.unwrap().is_none());
        assert!(errors.contains_key("oid"));
    }

    #[tokio::test]
    async fn test_code_matches_all_organizations() {
        let registry = InMemoryRegistry::new();
        registry.organizations.insert(organization("1234567-8", "1.1"));
        registry.organizations.insert(organization("1234567-8", "1.2"));
        registry.organizations.insert(organization("7654321-0", "1.3"));

        let (result, _) = run(&registry, None, Some("1234567-8"), None, true).await;
        assert_eq!(result.unwrap().unwrap().len(), 2);
    }
}
