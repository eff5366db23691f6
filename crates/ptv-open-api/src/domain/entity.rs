//! Canonical registry entities.
//!
//! Every version's request and response contract maps to and from these.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PublishingStatus {
    Draft,
    Published,
    Modified,
    Archived,
    Deleted,
    OldPublished,
}

impl PublishingStatus {
    /// Statuses a write request may carry.
    pub const REQUEST_VALUES: [&'static str; 4] = ["Draft", "Published", "Deleted", "Archived"];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Draft" => Some(Self::Draft),
            "Published" => Some(Self::Published),
            "Modified" => Some(Self::Modified),
            "Archived" => Some(Self::Archived),
            "Deleted" => Some(Self::Deleted),
            "OldPublished" => Some(Self::OldPublished),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Published => "Published",
            Self::Modified => "Modified",
            Self::Archived => "Archived",
            Self::Deleted => "Deleted",
            Self::OldPublished => "OldPublished",
        }
    }

    /// Shown to anonymous readers.
    pub fn is_visible(self) -> bool {
        matches!(self, Self::Published | Self::Modified)
    }

    pub fn is_removed(self) -> bool {
        matches!(self, Self::Archived | Self::Deleted)
    }

    /// Connections of an entity may only change while it is live.
    pub fn allows_connection_update(self) -> bool {
        matches!(self, Self::Draft | Self::Published | Self::Modified)
    }

    /// Removed entities may only be restored as drafts (or stay removed).
    pub fn can_transition_to(self, next: PublishingStatus) -> bool {
        match self {
            Self::Archived | Self::Deleted => {
                matches!(next, Self::Draft | Self::Archived | Self::Deleted)
            }
            Self::OldPublished => false,
            _ => true,
        }
    }
}

impl std::fmt::Display for PublishingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedText {
    pub language: String,
    pub value: String,
}

impl LocalizedText {
    pub fn new(language: impl Into<String>, value: impl Into<String>) -> Self {
        Self { language: language.into(), value: value.into() }
    }
}

/// External id scoped to the organization that created the entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceId {
    pub value: String,
    pub owner: Option<Uuid>,
}

/// Shared read surface of stored entities.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Used in not-found messages, e.g. "Service channel with id ..."
    const LABEL: &'static str;

    fn id(&self) -> Uuid;
    fn names(&self) -> &[LocalizedText];
    fn publishing_status(&self) -> PublishingStatus;
    fn modified(&self) -> DateTime<Utc>;

    /// Organization the entity belongs to, for organization-scoped listings.
    fn organization_id(&self) -> Option<Uuid> {
        None
    }

    fn source(&self) -> Option<&SourceId> {
        None
    }

    /// Finnish name first, otherwise the first one.
    fn display_name(&self) -> Option<&str> {
        let names = self.names();
        names
            .iter()
            .find(|n| n.language == "fi")
            .or_else(|| names.first())
            .map(|n| n.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Organization {
    pub id: Uuid,
    pub source: Option<SourceId>,
    pub parent_id: Option<Uuid>,
    pub business_code: Option<String>,
    pub oid: Option<String>,
    pub organization_type: Option<String>,
    pub names: Vec<LocalizedText>,
    pub descriptions: Vec<LocalizedText>,
    pub publishing_status: PublishingStatus,
    pub modified: DateTime<Utc>,
}

impl Entity for Organization {
    const LABEL: &'static str = "Organization";

    fn id(&self) -> Uuid {
        self.id
    }

    fn names(&self) -> &[LocalizedText] {
        &self.names
    }

    fn publishing_status(&self) -> PublishingStatus {
        self.publishing_status
    }

    fn modified(&self) -> DateTime<Utc> {
        self.modified
    }

    fn organization_id(&self) -> Option<Uuid> {
        Some(self.id)
    }

    fn source(&self) -> Option<&SourceId> {
        self.source.as_ref()
    }
}

/// Taxonomy term lists shared by services and general descriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FintoTerms {
    #[serde(default)]
    pub service_classes: Vec<String>,
    #[serde(default)]
    pub ontology_terms: Vec<String>,
    #[serde(default)]
    pub target_groups: Vec<String>,
    #[serde(default)]
    pub life_events: Vec<String>,
    #[serde(default)]
    pub industrial_classes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    pub id: Uuid,
    pub source: Option<SourceId>,
    pub organization_id: Uuid,
    pub general_description_id: Option<Uuid>,
    pub service_type: Option<String>,
    pub names: Vec<LocalizedText>,
    pub descriptions: Vec<LocalizedText>,
    pub languages: Vec<String>,
    pub finto: FintoTerms,
    pub publishing_status: PublishingStatus,
    pub modified: DateTime<Utc>,
}

impl Entity for Service {
    const LABEL: &'static str = "Service";

    fn id(&self) -> Uuid {
        self.id
    }

    fn names(&self) -> &[LocalizedText] {
        &self.names
    }

    fn publishing_status(&self) -> PublishingStatus {
        self.publishing_status
    }

    fn modified(&self) -> DateTime<Utc> {
        self.modified
    }

    fn organization_id(&self) -> Option<Uuid> {
        Some(self.organization_id)
    }

    fn source(&self) -> Option<&SourceId> {
        self.source.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelType {
    EChannel,
    WebPage,
    PrintableForm,
    Phone,
    ServiceLocation,
}

impl ChannelType {
    pub const NAMES: [&'static str; 5] = ["EChannel", "WebPage", "PrintableForm", "Phone", "ServiceLocation"];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "EChannel" => Some(Self::EChannel),
            "WebPage" => Some(Self::WebPage),
            "PrintableForm" => Some(Self::PrintableForm),
            "Phone" => Some(Self::Phone),
            "ServiceLocation" => Some(Self::ServiceLocation),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceChannel {
    pub id: Uuid,
    pub source: Option<SourceId>,
    pub organization_id: Uuid,
    pub channel_type: ChannelType,
    pub names: Vec<LocalizedText>,
    pub descriptions: Vec<LocalizedText>,
    pub languages: Vec<String>,
    /// Usable in connections by every organization.
    pub is_visible_for_all: bool,
    pub publishing_status: PublishingStatus,
    pub modified: DateTime<Utc>,
}

impl Entity for ServiceChannel {
    const LABEL: &'static str = "Service channel";

    fn id(&self) -> Uuid {
        self.id
    }

    fn names(&self) -> &[LocalizedText] {
        &self.names
    }

    fn publishing_status(&self) -> PublishingStatus {
        self.publishing_status
    }

    fn modified(&self) -> DateTime<Utc> {
        self.modified
    }

    fn organization_id(&self) -> Option<Uuid> {
        Some(self.organization_id)
    }

    fn source(&self) -> Option<&SourceId> {
        self.source.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCollection {
    pub id: Uuid,
    pub source: Option<SourceId>,
    pub organization_id: Uuid,
    pub names: Vec<LocalizedText>,
    pub descriptions: Vec<LocalizedText>,
    pub service_ids: Vec<Uuid>,
    pub publishing_status: PublishingStatus,
    pub modified: DateTime<Utc>,
}

impl Entity for ServiceCollection {
    const LABEL: &'static str = "Service collection";

    fn id(&self) -> Uuid {
        self.id
    }

    fn names(&self) -> &[LocalizedText] {
        &self.names
    }

    fn publishing_status(&self) -> PublishingStatus {
        self.publishing_status
    }

    fn modified(&self) -> DateTime<Utc> {
        self.modified
    }

    fn organization_id(&self) -> Option<Uuid> {
        Some(self.organization_id)
    }

    fn source(&self) -> Option<&SourceId> {
        self.source.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneralDescription {
    pub id: Uuid,
    pub names: Vec<LocalizedText>,
    pub descriptions: Vec<LocalizedText>,
    pub languages: Vec<String>,
    pub finto: FintoTerms,
    pub publishing_status: PublishingStatus,
    pub modified: DateTime<Utc>,
}

impl Entity for GeneralDescription {
    const LABEL: &'static str = "General description";

    fn id(&self) -> Uuid {
        self.id
    }

    fn names(&self) -> &[LocalizedText] {
        &self.names
    }

    fn publishing_status(&self) -> PublishingStatus {
        self.publishing_status
    }

    fn modified(&self) -> DateTime<Utc> {
        self.modified
    }
}

/// Service ↔ channel relation.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub service_id: Uuid,
    pub service_channel_id: Uuid,
    pub extra_types: Vec<String>,
    pub description: Vec<LocalizedText>,
    pub modified: DateTime<Utc>,
}

impl Connection {
    pub fn key(&self) -> (Uuid, Uuid) {
        (self.service_id, self.service_channel_id)
    }
}

/// Entry of a reference code list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeItem {
    pub code: String,
    pub names: Vec<LocalizedText>,
}

impl CodeItem {
    pub fn new(code: &str, names: &[(&str, &str)]) -> Self {
        Self {
            code: code.to_string(),
            names: names.iter().map(|(l, v)| LocalizedText::new(*l, *v)).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FintoKind {
    ServiceClass,
    OntologyTerm,
    TargetGroup,
    LifeEvent,
    IndustrialClass,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility() {
        assert!(PublishingStatus::Published.is_visible());
        assert!(PublishingStatus::Modified.is_visible());
        assert!(!PublishingStatus::Draft.is_visible());
        assert!(!PublishingStatus::Archived.is_visible());
    }

    #[test]
    fn test_connection_update_statuses() {
        assert!(PublishingStatus::Draft.allows_connection_update());
        assert!(PublishingStatus::Modified.allows_connection_update());
        assert!(!PublishingStatus::Deleted.allows_connection_update());
        assert!(!PublishingStatus::OldPublished.allows_connection_update());
    }

    #[test]
    fn test_transitions() {
        use PublishingStatus::*;
        assert!(Published.can_transition_to(Archived));
        assert!(Draft.can_transition_to(Published));
        assert!(Archived.can_transition_to(Draft));
        assert!(Deleted.can_transition_to(Deleted));
        assert!(!Archived.can_transition_to(Published));
        assert!(!Deleted.can_transition_to(Published));
    }

    #[test]
    fn test_display_name_prefers_finnish() {
        let org = Organization {
            id: Uuid::new_v4(),
            source: None,
            parent_id: None,
            business_code: None,
            oid: None,
            organization_type: None,
            names: vec![LocalizedText::new("en", "City"), LocalizedText::new("fi", "Kaupunki")],
            descriptions: vec![],
            publishing_status: PublishingStatus::Published,
            modified: Utc::now(),
        };
        assert_eq!(org.display_name(), Some("Kaupunki"));
    }
}
