//! Field checks shared by the entity managers.
//!
//! All of them accumulate into the request's error set. An `Err` means the
//! domain collaborator failed.

use uuid::Uuid;

use crate::auth::AuthContext;
use crate::domain::{
    DomainServices, Entity, EntityStore, FintoKind, FintoTerms, LocalizedText, PublishingStatus,
    SourceId,
};
use crate::shared::error::{ApiError, Result};
use crate::validation::{
    field_path, EnumValidator, GuidParser, IdValidator, ParameterValidator, RequiredValidator,
    ValidationErrors,
};

pub const REQUIRED_MESSAGE: &str = "The field is required.";

/// Localized texts: presence, known language, non-empty value.
pub async fn check_localized(
    services: &DomainServices,
    field: &str,
    texts: &[LocalizedText],
    required: bool,
    errors: &mut ValidationErrors,
) -> Result<()> {
    if required && texts.is_empty() {
        errors.add(field, REQUIRED_MESSAGE);
        return Ok(());
    }

    for (i, text) in texts.iter().enumerate() {
        if text.language.trim().is_empty() {
            errors.add(field_path(field, i, "language"), REQUIRED_MESSAGE);
        } else if !services.codes.language_exists(&text.language).await? {
            errors.add(
                field_path(field, i, "language"),
                format!("Language code '{}' does not exist.", text.language),
            );
        }
        if text.value.trim().is_empty() {
            errors.add(field_path(field, i, "value"), REQUIRED_MESSAGE);
        }
    }
    Ok(())
}

pub async fn check_languages(
    services: &DomainServices,
    field: &str,
    languages: &[String],
    errors: &mut ValidationErrors,
) -> Result<()> {
    for (i, language) in languages.iter().enumerate() {
        if !services.codes.language_exists(language).await? {
            errors.add(
                format!("{}[{}]", field, i),
                format!("Language code '{}' does not exist.", language),
            );
        }
    }
    Ok(())
}

pub async fn check_finto(
    services: &DomainServices,
    field: &str,
    kind: FintoKind,
    uris: &[String],
    errors: &mut ValidationErrors,
) -> Result<()> {
    for (i, uri) in uris.iter().enumerate() {
        if !services.codes.finto_term_exists(kind, uri).await? {
            errors.add(format!("{}[{}]", field, i), format!("Finto item '{}' not found.", uri));
        }
    }
    Ok(())
}

/// Every term list of `terms` against its finto vocabulary.
pub async fn check_finto_terms(
    services: &DomainServices,
    terms: &FintoTerms,
    errors: &mut ValidationErrors,
) -> Result<()> {
    check_finto(services, "serviceClasses", FintoKind::ServiceClass, &terms.service_classes, errors).await?;
    check_finto(services, "ontologyTerms", FintoKind::OntologyTerm, &terms.ontology_terms, errors).await?;
    check_finto(services, "targetGroups", FintoKind::TargetGroup, &terms.target_groups, errors).await?;
    check_finto(services, "lifeEvents", FintoKind::LifeEvent, &terms.life_events, errors).await?;
    check_finto(services, "industrialClasses", FintoKind::IndustrialClass, &terms.industrial_classes, errors)
        .await
}

/// Required `publishingStatus` limited to the request values.
pub fn check_publishing_status(
    value: Option<&str>,
    errors: &mut ValidationErrors,
) -> Option<PublishingStatus> {
    let validator = EnumValidator::new(value, "publishingStatus", &PublishingStatus::REQUEST_VALUES);
    validator.validate(errors);
    validator.matched().and_then(PublishingStatus::parse)
}

/// Transition from the stored status to the requested one.
pub fn check_transition(
    current: PublishingStatus,
    requested: Option<&str>,
    errors: &mut ValidationErrors,
) {
    let Some(requested) = requested.and_then(PublishingStatus::parse) else {
        return;
    };
    if !current.can_transition_to(requested) {
        errors.add(
            "publishingStatus",
            format!("Publishing status cannot be changed from {} to {}.", current, requested),
        );
    }
}

/// Top-level organization reference: well formed, existing and usable by
/// the caller.
pub async fn check_organization_reference(
    services: &DomainServices,
    auth: &AuthContext,
    field: &str,
    value: Option<&str>,
    required: bool,
    errors: &mut ValidationErrors,
) -> Result<Option<Uuid>> {
    if required {
        RequiredValidator { value, property_name: field }.validate(errors);
    }
    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };

    let before = errors.len();
    IdValidator::new(value, field).validate(errors);
    if errors.len() != before {
        return Ok(None);
    }
    let Some(id) = GuidParser::try_parse(value) else {
        return Ok(None);
    };

    match services.organizations.get(id).await? {
        Some(organization) if !organization.publishing_status.is_removed() => {
            if !auth.can_see_organization(id) {
                errors.add(field, format!("User has no rights to use organization '{}'.", id));
            }
            Ok(Some(id))
        }
        _ => {
            errors.add(field, format!("Organization with id '{}' not found.", id));
            Ok(None)
        }
    }
}

/// A referenced entity (by top-level id field) must exist and not be removed.
pub async fn check_reference<T: Entity>(
    store: &dyn EntityStore<T>,
    field: &str,
    value: Option<&str>,
    errors: &mut ValidationErrors,
) -> Result<Option<Uuid>> {
    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };
    let before = errors.len();
    IdValidator::new(value, field).validate(errors);
    if errors.len() != before {
        return Ok(None);
    }
    let Some(id) = GuidParser::try_parse(value) else {
        return Ok(None);
    };

    match store.get(id).await? {
        Some(entity) if !entity.publishing_status().is_removed() => Ok(Some(id)),
        _ => {
            errors.add(field, format!("{} with id '{}' not found.", T::LABEL, id));
            Ok(None)
        }
    }
}

/// A new entity's sourceId must be unused within the caller's organization.
pub async fn check_source_id_free<T: Entity>(
    store: &dyn EntityStore<T>,
    source_id: Option<&str>,
    owner: Option<Uuid>,
    errors: &mut ValidationErrors,
) -> Result<()> {
    let Some(source_id) = source_id.filter(|s| !s.trim().is_empty()) else {
        return Ok(());
    };
    if store.find_by_source_id(source_id, owner).await?.is_some() {
        errors.add(
            "sourceId",
            format!("{} with source id '{}' already exists.", T::LABEL, source_id),
        );
    }
    Ok(())
}

/// Current version by id, 404 otherwise.
pub async fn resolve_by_id<T: Entity>(store: &dyn EntityStore<T>, id: Uuid) -> Result<T> {
    store
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("{} with id '{}' not found.", T::LABEL, id)))
}

/// Current version by the caller-scoped sourceId, 404 otherwise.
pub async fn resolve_by_source_id<T: Entity>(
    store: &dyn EntityStore<T>,
    source_id: &str,
    owner: Option<Uuid>,
) -> Result<T> {
    store.find_by_source_id(source_id, owner).await?.ok_or_else(|| {
        ApiError::not_found(format!("{} with source id '{}' not found.", T::LABEL, source_id))
    })
}

/// sourceId to store: kept from the current version unless the request
/// names one.
pub fn source_for(
    requested: Option<&str>,
    owner: Option<Uuid>,
    current: Option<&SourceId>,
) -> Option<SourceId> {
    match requested.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => Some(SourceId { value: value.to_string(), owner }),
        None => current.cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::domain::{seed, InMemoryRegistry, Organization};
    use chrono::Utc;

    fn registry() -> InMemoryRegistry {
        let registry = InMemoryRegistry::new();
        seed::seed_reference_data(&registry);
        registry
    }

    fn auth(organization: Option<Uuid>) -> AuthContext {
        AuthContext {
            subject: "u".into(),
            role: Some(Role::Pete),
            organization_id: organization,
            delegated_organizations: vec![],
            access_rights: vec![],
        }
    }

    fn organization() -> Organization {
        Organization {
            id: Uuid::new_v4(),
            source: None,
            parent_id: None,
            business_code: None,
            oid: None,
            organization_type: None,
            names: vec![LocalizedText::new("fi", "Org")],
            descriptions: vec![],
            publishing_status: PublishingStatus::Published,
            modified: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_localized_texts() {
        let services = registry().domain_services();
        let mut errors = ValidationErrors::new();
        check_localized(&services, "names", &[], true, &mut errors).await.unwrap();
        assert_eq!(errors.get("names").unwrap(), [REQUIRED_MESSAGE]);

        let mut errors = ValidationErrors::new();
        let texts = vec![LocalizedText::new("fi", "Nimi"), LocalizedText::new("xx", "")];
        check_localized(&services, "names", &texts, true, &mut errors).await.unwrap();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["names[1].language", "names[1].value"]);
    }

    #[tokio::test]
    async fn test_finto_terms() {
        let services = registry().domain_services();
        let mut errors = ValidationErrors::new();
        let uris = vec![seed::SERVICE_CLASS_URI.to_string(), "http://unknown".to_string()];
        check_finto(&services, "serviceClasses", FintoKind::ServiceClass, &uris, &mut errors)
            .await
            .unwrap();
        assert!(errors.contains_key("serviceClasses[1]"));
        assert!(!errors.contains_key("serviceClasses[0]"));
    }

    #[test]
    fn test_publishing_status() {
        let mut errors = ValidationErrors::new();
        assert_eq!(check_publishing_status(Some("Published"), &mut errors), Some(PublishingStatus::Published));
        assert!(errors.is_empty());

        assert_eq!(check_publishing_status(Some("Modified"), &mut errors), None);
        assert_eq!(check_publishing_status(None, &mut errors), None);
        assert_eq!(errors.get("publishingStatus").unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_organization_reference() {
        let registry = registry();
        let own = organization();
        let other = organization();
        registry.organizations.insert(own.clone());
        registry.organizations.insert(other.clone());
        let services = registry.domain_services();
        let caller = auth(Some(own.id));

        let mut errors = ValidationErrors::new();
        let id = own.id.to_string();
        let resolved = check_organization_reference(&services, &caller, "organizationId", Some(&id), true, &mut errors)
            .await
            .unwrap();
        assert_eq!(resolved, Some(own.id));
        assert!(errors.is_empty());

        let id = other.id.to_string();
        check_organization_reference(&services, &caller, "organizationId", Some(&id), true, &mut errors)
            .await
            .unwrap();
        assert!(errors.get("organizationId").unwrap()[0].contains("no rights"));

        let mut errors = ValidationErrors::new();
        let missing = Uuid::new_v4().to_string();
        check_organization_reference(&services, &caller, "organizationId", Some(&missing), true, &mut errors)
            .await
            .unwrap();
        assert!(errors.get("organizationId").unwrap()[0].contains("not found"));

        let mut errors = ValidationErrors::new();
        check_organization_reference(&services, &caller, "organizationId", None, true, &mut errors)
            .await
            .unwrap();
        assert_eq!(errors.get("organizationId").unwrap(), [REQUIRED_MESSAGE]);
    }

    #[test]
    fn test_transition() {
        let mut errors = ValidationErrors::new();
        check_transition(PublishingStatus::Archived, Some("Draft"), &mut errors);
        assert!(errors.is_empty());
        check_transition(PublishingStatus::Archived, Some("Published"), &mut errors);
        assert!(errors.contains_key("publishingStatus"));
    }

    #[test]
    fn test_source_for() {
        let owner = Some(Uuid::new_v4());
        let current = SourceId { value: "old".into(), owner };
        assert_eq!(source_for(None, owner, Some(&current)), Some(current.clone()));
        assert_eq!(source_for(Some("new"), owner, Some(&current)).unwrap().value, "new");
        assert_eq!(source_for(Some(" "), owner, None), None);
    }
}
