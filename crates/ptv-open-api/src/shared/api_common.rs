//! Common API types and utilities
//!
//! Paging, list projection, body parsing and the version-agnostic
//! get/list operations every entity kind shares.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Entity, EntityStore, ListFilter, PageRequest};
use crate::shared::error::{ApiError, Result};
use crate::validation::{DateValidator, GuidParser, IdValidator, ParameterValidator, ValidationErrors};
use crate::version::ResponseShape;

pub const REQUEST_NULL_MESSAGE: &str = "Request is null.";
pub const PAGE_MESSAGE: &str = "The page number must be 1 or greater.";

/// Paged list body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub page_number: u32,
    pub page_size: u32,
    /// More pages exist while this exceeds `page_number`.
    pub page_count: u32,
    pub item_list: Vec<T>,
}

impl<T> PagedResult<T> {
    pub fn new(item_list: Vec<T>, page_number: u32, page_size: u32, total: u64) -> Self {
        let page_count = if page_size == 0 {
            0
        } else {
            total.div_ceil(page_size as u64) as u32
        };
        Self { page_number, page_size, page_count, item_list }
    }
}

/// List entry: id only in the legacy shape, id and name otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ListItem {
    pub fn project<T: Entity>(entity: &T, shape: ResponseShape) -> Self {
        Self {
            id: entity.id(),
            name: match shape {
                ResponseShape::Legacy => None,
                _ => entity.display_name().map(str::to_string),
            },
        }
    }
}

/// `?date&dateBefore&page&archived`
///
/// Values stay text so malformed input becomes a field error instead of an
/// extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub date: Option<String>,
    pub date_before: Option<String>,
    pub page: Option<String>,
    pub archived: Option<String>,
}

/// Parsed list parameters.
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    pub filter: ListFilter,
    pub page: u32,
}

impl ListQuery {
    pub fn parse(&self, errors: &mut ValidationErrors) -> ListParams {
        DateValidator::new(self.date.as_deref(), "date").validate(errors);
        DateValidator::new(self.date_before.as_deref(), "dateBefore").validate(errors);
        let page = parse_page(self.page.as_deref(), errors);
        let archived = parse_flag(self.archived.as_deref(), "archived", errors);

        ListParams {
            filter: ListFilter {
                date: parse_date(self.date.as_deref()),
                date_before: parse_date(self.date_before.as_deref()),
                archived,
                organization_ids: None,
            },
            page,
        }
    }

    pub fn into_params(self) -> Result<ListParams> {
        let mut errors = ValidationErrors::new();
        let params = self.parse(&mut errors);
        ensure_valid(errors)?;
        Ok(params)
    }
}

/// 400 with the accumulated set unless it is empty.
pub fn ensure_valid(errors: ValidationErrors) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

/// Date query value as UTC; malformed values are reported by [`DateValidator`].
pub fn parse_date(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(DateValidator::parse)
        .map(|naive| naive.and_utc())
}

/// Missing page means 1.
pub fn parse_page(value: Option<&str>, errors: &mut ValidationErrors) -> u32 {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return 1;
    };
    match value.parse::<i64>() {
        Ok(page) if page < 1 => {
            errors.add("page", PAGE_MESSAGE);
            1
        }
        Ok(page) if page <= u32::MAX as i64 => page as u32,
        _ => {
            errors.add("page", format!("The value '{}' is not valid for page.", value));
            1
        }
    }
}

pub fn parse_flag(value: Option<&str>, property_name: &str, errors: &mut ValidationErrors) -> bool {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => false,
        Some(v) if v.eq_ignore_ascii_case("true") => true,
        Some(v) if v.eq_ignore_ascii_case("false") => false,
        Some(v) => {
            errors.add(property_name, format!("The value '{}' is not valid for {}.", v, property_name));
            false
        }
    }
}

/// JSON body of a write; empty and `null` bodies are "Request is null."
pub fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T> {
    let text = std::str::from_utf8(body)
        .map_err(|e| ApiError::validation("request", e.to_string()))?
        .trim();
    if text.is_empty() || text == "null" {
        return Err(ApiError::validation("request", REQUEST_NULL_MESSAGE));
    }
    serde_json::from_str(text).map_err(|e| ApiError::validation("request", e.to_string()))
}

pub fn not_found_message<T: Entity>(id: impl std::fmt::Display) -> String {
    format!("{} with id '{}' not found.", T::LABEL, id)
}

/// Path id checked with [`IdValidator`]: 400 keyed by `property_name`.
pub fn path_id(value: &str, property_name: &str) -> Result<Uuid> {
    let mut errors = ValidationErrors::new();
    IdValidator::new(value, property_name).validate(&mut errors);
    ensure_valid(errors)?;
    GuidParser::parse(value)
}

/// Visible entity by path id, 404 otherwise.
pub async fn get_visible<T: Entity>(store: &dyn EntityStore<T>, id: &str) -> Result<T> {
    let uuid = path_id(id, "id")?;
    store
        .get(uuid)
        .await?
        .filter(|e| e.publishing_status().is_visible())
        .ok_or_else(|| ApiError::not_found(not_found_message::<T>(id)))
}

/// Page of visible entities projected to list items.
pub async fn list_entities<T: Entity>(
    store: &dyn EntityStore<T>,
    params: ListParams,
    page_size: u32,
    shape: ResponseShape,
) -> Result<PagedResult<ListItem>> {
    let page = PageRequest { page: params.page, page_size };
    let result = store.list(&params.filter, page).await?;
    let items = result.items.iter().map(|e| ListItem::project(e, shape)).collect();
    Ok(PagedResult::new(items, params.page, page_size, result.total))
}
