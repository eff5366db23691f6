//! Version tags and entity kinds of the versioned surface.

use std::fmt;
use std::ops::RangeInclusive;

/// Integer version tag taken from `/api/v{N}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ApiVersion(u8);

impl ApiVersion {
    pub const OLDEST: u8 = 2;
    pub const LATEST: u8 = 11;

    pub fn new(number: u8) -> Option<Self> {
        Self::range().contains(&number).then_some(Self(number))
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn range() -> RangeInclusive<u8> {
        Self::OLDEST..=Self::LATEST
    }

    pub fn all() -> impl Iterator<Item = ApiVersion> {
        Self::range().map(ApiVersion)
    }

    /// `/api/v{N}`
    pub fn path_prefix(self) -> String {
        format!("/api/{}", self)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Organization,
    Service,
    ServiceChannel,
    ServiceCollection,
    GeneralDescription,
    Connection,
    CodeList,
    Common,
}

impl EntityKind {
    pub const ALL: [EntityKind; 8] = [
        EntityKind::Organization,
        EntityKind::Service,
        EntityKind::ServiceChannel,
        EntityKind::ServiceCollection,
        EntityKind::GeneralDescription,
        EntityKind::Connection,
        EntityKind::CodeList,
        EntityKind::Common,
    ];

    /// Path segment under `/api/v{N}`.
    pub fn path_name(self) -> &'static str {
        match self {
            EntityKind::Organization => "Organization",
            EntityKind::Service => "Service",
            EntityKind::ServiceChannel => "ServiceChannel",
            EntityKind::ServiceCollection => "ServiceCollection",
            EntityKind::GeneralDescription => "GeneralDescription",
            EntityKind::Connection => "Connection",
            EntityKind::CodeList => "CodeList",
            EntityKind::Common => "Common",
        }
    }

    pub fn supported_versions(self) -> RangeInclusive<u8> {
        match self {
            EntityKind::ServiceCollection => 7..=ApiVersion::LATEST,
            _ => 6..=ApiVersion::LATEST,
        }
    }

    pub fn supports(self, version: ApiVersion) -> bool {
        self.supported_versions().contains(&version.number())
    }

    pub fn prefix(self, version: ApiVersion) -> String {
        format!("{}/{}", version.path_prefix(), self.path_name())
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_bounds() {
        assert!(ApiVersion::new(1).is_none());
        assert!(ApiVersion::new(12).is_none());
        assert_eq!(ApiVersion::new(7).unwrap().to_string(), "v7");
        assert_eq!(ApiVersion::all().count(), 10);
    }

    #[test]
    fn test_supported_ranges() {
        let v6 = ApiVersion::new(6).unwrap();
        let v5 = ApiVersion::new(5).unwrap();
        assert!(EntityKind::Organization.supports(v6));
        assert!(!EntityKind::Organization.supports(v5));
        assert!(!EntityKind::ServiceCollection.supports(v6));
        assert!(EntityKind::ServiceCollection.supports(ApiVersion::new(7).unwrap()));
    }

    #[test]
    fn test_prefix() {
        let v9 = ApiVersion::new(9).unwrap();
        assert_eq!(EntityKind::ServiceChannel.prefix(v9), "/api/v9/ServiceChannel");
    }
}
