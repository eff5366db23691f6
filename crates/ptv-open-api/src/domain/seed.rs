//! Reference data and development fixtures for the in-memory registry.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::entity::{
    ChannelType, CodeItem, FintoKind, LocalizedText, Organization, PublishingStatus,
    ServiceChannel,
};
use super::memory::InMemoryRegistry;

pub const SERVICE_CLASS_URI: &str = "http://uri.suomi.fi/codelist/ptv/ptvserclass2/code/P1";
pub const ONTOLOGY_TERM_URI: &str = "http://www.yso.fi/onto/koko/p1";
pub const TARGET_GROUP_URI: &str = "http://uri.suomi.fi/codelist/ptv/ptvkohderyhmat/code/KR1";
pub const LIFE_EVENT_URI: &str = "http://uri.suomi.fi/codelist/ptv/ptvelamantilanteet/code/KE1";
pub const INDUSTRIAL_CLASS_URI: &str = "http://www.stat.fi/meta/luokitukset/toimiala/001-2008/01";

/// Business code of the development organization.
pub const DEV_BUSINESS_CODE: &str = "0201256-6";
pub const DEV_OID: &str = "1.2.246.10.2012566";

/// Language, municipality and country codes plus one term per finto kind.
pub fn seed_reference_data(registry: &InMemoryRegistry) {
    let codes = &registry.codes;

    for item in [
        CodeItem::new("fi", &[("fi", "suomi"), ("sv", "finska"), ("en", "Finnish")]),
        CodeItem::new("sv", &[("fi", "ruotsi"), ("sv", "svenska"), ("en", "Swedish")]),
        CodeItem::new("en", &[("fi", "englanti"), ("sv", "engelska"), ("en", "English")]),
        CodeItem::new("se", &[("fi", "pohjoissaame"), ("en", "Northern Sami")]),
    ] {
        codes.add_language(item);
    }

    for item in [
        CodeItem::new("091", &[("fi", "Helsinki"), ("sv", "Helsingfors")]),
        CodeItem::new("049", &[("fi", "Espoo"), ("sv", "Esbo")]),
        CodeItem::new("092", &[("fi", "Vantaa"), ("sv", "Vanda")]),
        CodeItem::new("837", &[("fi", "Tampere"), ("sv", "Tammerfors")]),
    ] {
        codes.add_municipality(item);
    }

    for item in [
        CodeItem::new("FI", &[("fi", "Suomi"), ("en", "Finland")]),
        CodeItem::new("SE", &[("fi", "Ruotsi"), ("en", "Sweden")]),
        CodeItem::new("EE", &[("fi", "Viro"), ("en", "Estonia")]),
    ] {
        codes.add_country(item);
    }

    codes.add_finto_term(FintoKind::ServiceClass, SERVICE_CLASS_URI);
    codes.add_finto_term(FintoKind::OntologyTerm, ONTOLOGY_TERM_URI);
    codes.add_finto_term(FintoKind::TargetGroup, TARGET_GROUP_URI);
    codes.add_finto_term(FintoKind::LifeEvent, LIFE_EVENT_URI);
    codes.add_finto_term(FintoKind::IndustrialClass, INDUSTRIAL_CLASS_URI);

    info!("Reference code lists loaded");
}

/// One published organization with a shared channel, for local runs.
pub fn seed_development_data(registry: &InMemoryRegistry) -> Uuid {
    let organization = Organization {
        id: Uuid::new_v4(),
        source: None,
        parent_id: None,
        business_code: Some(DEV_BUSINESS_CODE.to_string()),
        oid: Some(DEV_OID.to_string()),
        organization_type: Some("State".to_string()),
        names: vec![
            LocalizedText::new("fi", "Kehitysorganisaatio"),
            LocalizedText::new("en", "Development organization"),
        ],
        descriptions: vec![],
        publishing_status: PublishingStatus::Published,
        modified: Utc::now(),
    };
    let organization_id = organization.id;
    registry.organizations.insert(organization);

    registry.channels.insert(ServiceChannel {
        id: Uuid::new_v4(),
        source: None,
        organization_id,
        channel_type: ChannelType::WebPage,
        names: vec![LocalizedText::new("fi", "Yhteinen verkkosivu")],
        descriptions: vec![],
        languages: vec!["fi".to_string()],
        is_visible_for_all: true,
        publishing_status: PublishingStatus::Published,
        modified: Utc::now(),
    });

    info!(organization_id = %organization_id, "Development data seeded");
    organization_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::CodeService;

    #[tokio::test]
    async fn test_reference_data() {
        let registry = InMemoryRegistry::new();
        seed_reference_data(&registry);

        assert!(registry.codes.language_exists("fi").await.unwrap());
        assert!(!registry.codes.language_exists("xx").await.unwrap());
        assert!(registry
            .codes
            .finto_term_exists(FintoKind::TargetGroup, TARGET_GROUP_URI)
            .await
            .unwrap());
        assert_eq!(registry.codes.municipality_codes().await.unwrap().len(), 4);
    }

    #[test]
    fn test_development_data() {
        let registry = InMemoryRegistry::new();
        seed_development_data(&registry);
        assert_eq!(registry.organizations.len(), 1);
        assert_eq!(registry.channels.len(), 1);
    }
}
