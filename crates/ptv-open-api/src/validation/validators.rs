//! Parameter validators.
//!
//! Each validator looks at one value and appends at most one message to the
//! request's [`ValidationErrors`]. None of them fail on malformed input.

use chrono::{NaiveDateTime, Timelike};

use super::errors::ValidationErrors;
use super::guid::GuidParser;
use super::patterns::{Pattern, DATE};

/// Wire format of every date query parameter.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub const INVALID_DATE_MESSAGE: &str =
    "Invalid date format. Date should be in format yyyy-MM-ddTHH:mm:ss.";

pub trait ParameterValidator {
    fn validate(&self, errors: &mut ValidationErrors);
}

/// Optional UTC date in `yyyy-MM-ddTHH:mm:ss`.
pub struct DateValidator<'a> {
    pub value: Option<&'a str>,
    pub property_name: &'a str,
}

impl<'a> DateValidator<'a> {
    pub fn new(value: Option<&'a str>, property_name: &'a str) -> Self {
        Self { value, property_name }
    }

    /// Zero-padded fields only. chrono reads second 60 as a leap second in
    /// the nanosecond field, which is rejected here.
    pub fn parse(value: &str) -> Option<NaiveDateTime> {
        if !DATE.is_full_match(value) {
            return None;
        }
        NaiveDateTime::parse_from_str(value, DATE_FORMAT)
            .ok()
            .filter(|date| date.nanosecond() < 1_000_000_000)
    }
}

impl ParameterValidator for DateValidator<'_> {
    fn validate(&self, errors: &mut ValidationErrors) {
        let Some(value) = self.value.filter(|v| !v.trim().is_empty()) else {
            return;
        };
        if Self::parse(value).is_none() {
            errors.add(self.property_name, INVALID_DATE_MESSAGE);
        }
    }
}

/// Canonical GUID text.
pub struct IdValidator<'a> {
    pub value: &'a str,
    pub property_name: &'a str,
}

impl<'a> IdValidator<'a> {
    pub fn new(value: &'a str, property_name: &'a str) -> Self {
        Self { value, property_name }
    }
}

impl ParameterValidator for IdValidator<'_> {
    fn validate(&self, errors: &mut ValidationErrors) {
        if !GuidParser::is_valid(self.value) {
            errors.add(
                self.property_name,
                format!("Value '{}' is not a valid identifier.", self.value),
            );
        }
    }
}

/// Full match against a pattern. Empty values are left to presence checks.
pub struct RegExValidator<'a> {
    pub value: Option<&'a str>,
    pub property_name: &'a str,
    pub pattern: &'a Pattern,
}

impl<'a> RegExValidator<'a> {
    pub fn new(value: Option<&'a str>, property_name: &'a str, pattern: &'a Pattern) -> Self {
        Self { value, property_name, pattern }
    }
}

impl ParameterValidator for RegExValidator<'_> {
    fn validate(&self, errors: &mut ValidationErrors) {
        let Some(value) = self.value.filter(|v| !v.is_empty()) else {
            return;
        };
        if !self.pattern.is_full_match(value) {
            errors.add(
                self.property_name,
                format!(
                    "'{}' does not match expression '{}'.",
                    value,
                    self.pattern.source()
                ),
            );
        }
    }
}

/// Value must be one of a fixed set of names.
pub struct EnumValidator<'a> {
    pub value: Option<&'a str>,
    pub property_name: &'a str,
    pub allowed: &'a [&'a str],
    pub case_sensitive: bool,
    pub allow_empty: bool,
}

impl<'a> EnumValidator<'a> {
    pub fn new(value: Option<&'a str>, property_name: &'a str, allowed: &'a [&'a str]) -> Self {
        Self {
            value,
            property_name,
            allowed,
            case_sensitive: true,
            allow_empty: false,
        }
    }

    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self
    }

    pub fn optional(mut self) -> Self {
        self.allow_empty = true;
        self
    }

    /// The allowed name the value matched, in its declared spelling.
    pub fn matched(&self) -> Option<&'a str> {
        let value = self.value?;
        self.allowed.iter().copied().find(|allowed| {
            if self.case_sensitive {
                *allowed == value
            } else {
                allowed.eq_ignore_ascii_case(value)
            }
        })
    }
}

impl ParameterValidator for EnumValidator<'_> {
    fn validate(&self, errors: &mut ValidationErrors) {
        let value = self.value.unwrap_or("");
        if value.is_empty() {
            if !self.allow_empty {
                errors.add(self.property_name, "The field is required.");
            }
            return;
        }
        if self.matched().is_none() {
            errors.add(
                self.property_name,
                format!(
                    "'{}' is not a valid value. Allowed values are: {}.",
                    value,
                    self.allowed.join(", ")
                ),
            );
        }
    }
}

/// Required text value.
pub struct RequiredValidator<'a> {
    pub value: Option<&'a str>,
    pub property_name: &'a str,
}

impl ParameterValidator for RequiredValidator<'_> {
    fn validate(&self, errors: &mut ValidationErrors) {
        if self.value.map(str::trim).unwrap_or("").is_empty() {
            errors.add(self.property_name, "The field is required.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::patterns::BUSINESS_CODE;

    fn run(validator: &dyn ParameterValidator) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        validator.validate(&mut errors);
        errors
    }

    #[test]
    fn test_date_validator() {
        assert!(run(&DateValidator::new(Some("2021-01-02T03:04:05"), "date")).is_empty());
        assert!(run(&DateValidator::new(None, "date")).is_empty());

        let errors = run(&DateValidator::new(Some("2021-13-40T00:00:00"), "date"));
        assert_eq!(errors.get("date").unwrap(), [INVALID_DATE_MESSAGE]);

        let errors = run(&DateValidator::new(Some("not-a-date"), "dateBefore"));
        assert!(errors.contains_key("dateBefore"));
        assert!(!errors.contains_key("date"));
    }

    #[test]
    fn test_date_validator_rejects_other_formats() {
        assert!(!run(&DateValidator::new(Some("2021-01-02"), "date")).is_empty());
        assert!(!run(&DateValidator::new(Some("02.01.2021 03:04:05"), "date")).is_empty());
        for value in [
            "2021-1-2T3:4:5",
            "2021-01-02T03:04:60",
            " 2021-01-02T03:04:05",
            "2021-01-02T03:04:05 ",
            "+2021-01-02T03:04:05",
            "2021-02-30T03:04:05",
        ] {
            assert!(!run(&DateValidator::new(Some(value), "date")).is_empty(), "{}", value);
        }
        assert!(run(&DateValidator::new(Some("2021-12-31T23:59:59"), "date")).is_empty());
    }

    #[test]
    fn test_id_validator() {
        let id = uuid::Uuid::new_v4().to_string();
        assert!(run(&IdValidator::new(&id, "id")).is_empty());

        let errors = run(&IdValidator::new("abc", "id"));
        assert_eq!(errors.get("id").unwrap(), ["Value 'abc' is not a valid identifier."]);
    }

    #[test]
    fn test_regex_validator_mentions_pattern() {
        let errors = run(&RegExValidator::new(Some("12-3"), "code", &BUSINESS_CODE));
        let message = &errors.get("code").unwrap()[0];
        assert!(message.contains(BUSINESS_CODE.source()));

        assert!(run(&RegExValidator::new(Some(""), "code", &BUSINESS_CODE)).is_empty());
        assert!(run(&RegExValidator::new(None, "code", &BUSINESS_CODE)).is_empty());
    }

    #[test]
    fn test_enum_validator() {
        const TYPES: &[&str] = &["Service", "Organization"];

        assert!(run(&EnumValidator::new(Some("Service"), "type", TYPES)).is_empty());
        assert!(!run(&EnumValidator::new(Some("service"), "type", TYPES)).is_empty());
        assert!(run(&EnumValidator::new(Some("service"), "type", TYPES).case_insensitive()).is_empty());
        assert!(!run(&EnumValidator::new(None, "type", TYPES)).is_empty());
        assert!(run(&EnumValidator::new(None, "type", TYPES).optional()).is_empty());

        let validator = EnumValidator::new(Some("ORGANIZATION"), "type", TYPES).case_insensitive();
        assert_eq!(validator.matched(), Some("Organization"));
    }

    #[test]
    fn test_errors_accumulate_in_execution_order() {
        let mut errors = ValidationErrors::new();
        DateValidator::new(Some("x"), "dateBefore").validate(&mut errors);
        DateValidator::new(Some("y"), "date").validate(&mut errors);

        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["dateBefore", "date"]);
    }
}
