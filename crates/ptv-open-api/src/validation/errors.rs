//! Request-scoped validation error accumulator.
//!
//! Serializes to the `{ "field": ["message", ...] }` shape clients branch on.

use indexmap::IndexMap;
use serde::Serialize;

/// Ordered field-path → messages map. A request is valid iff it stays empty
/// after every validator has run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(IndexMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-entry set, for rejections that happen before any validator ran.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with at least one message.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Builds `parent[index].child` style field paths.
pub fn field_path(parent: &str, index: usize, child: &str) -> String {
    format!("{}[{}].{}", parent, index, child)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut errors = ValidationErrors::new();
        errors.add("page", "first");
        errors.add("date", "second");
        errors.add("page", "third");

        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["page", "date"]);
        assert_eq!(errors.get("page").unwrap(), ["first", "third"]);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_serializes_as_model_state() {
        let errors = ValidationErrors::single("Addresses[1].StreetAddress", "Required.");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({ "Addresses[1].StreetAddress": ["Required."] }));
    }

    #[test]
    fn test_field_path() {
        assert_eq!(field_path("channelRelations", 2, "serviceChannelId"), "channelRelations[2].serviceChannelId");
    }
}
