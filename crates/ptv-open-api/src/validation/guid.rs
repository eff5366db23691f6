//! Identifier parsing.

use uuid::Uuid;

use crate::shared::error::ApiError;

/// Parses canonical GUID text (`xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`).
///
/// Braced, URN and unhyphenated forms are rejected even though `Uuid`
/// would accept them.
pub struct GuidParser;

impl GuidParser {
    pub fn try_parse(value: &str) -> Option<Uuid> {
        if value.len() != 36 {
            return None;
        }
        let hyphens_in_place = value
            .char_indices()
            .all(|(i, c)| matches!(i, 8 | 13 | 18 | 23) == (c == '-'));
        if !hyphens_in_place {
            return None;
        }
        Uuid::try_parse(value).ok()
    }

    pub fn is_valid(value: &str) -> bool {
        Self::try_parse(value).is_some()
    }

    /// Parse or fail the whole request.
    pub fn parse(value: &str) -> Result<Uuid, ApiError> {
        Self::try_parse(value).ok_or_else(|| {
            ApiError::InvalidIdentifier(format!("'{}' is not a valid identifier.", value))
        })
    }

    /// Parse an optional value; empty text counts as absent.
    pub fn parse_optional(value: Option<&str>) -> Result<Option<Uuid>, ApiError> {
        match value.filter(|v| !v.trim().is_empty()) {
            Some(v) => Self::parse(v).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_text() {
        let id = Uuid::new_v4();
        assert_eq!(GuidParser::try_parse(&id.to_string()), Some(id));
        assert_eq!(GuidParser::try_parse(&id.to_string().to_uppercase()), Some(id));
    }

    #[test]
    fn test_non_canonical_forms_rejected() {
        let id = Uuid::new_v4();
        assert!(!GuidParser::is_valid(&id.simple().to_string()));
        assert!(!GuidParser::is_valid(&format!("{{{}}}", id)));
        assert!(!GuidParser::is_valid(&id.urn().to_string()));
        assert!(!GuidParser::is_valid("not-a-guid"));
        assert!(!GuidParser::is_valid(""));
        assert!(!GuidParser::is_valid(&format!(" {} ", id)));
    }

    #[test]
    fn test_parse_raises() {
        match GuidParser::parse("1234") {
            Err(ApiError::InvalidIdentifier(message)) => assert!(message.contains("1234")),
            other => panic!("expected InvalidIdentifier, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_optional() {
        assert_eq!(GuidParser::parse_optional(None).unwrap(), None);
        assert_eq!(GuidParser::parse_optional(Some("  ")).unwrap(), None);
        assert!(GuidParser::parse_optional(Some("bad")).is_err());
    }
}
