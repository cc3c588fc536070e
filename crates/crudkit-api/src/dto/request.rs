//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crudkit_core::config::PaginationConfig;
use crudkit_core::result::AppResult;
use crudkit_core::types::{FilterDescriptor, FilterOperator, SortOrder};

/// `include` query parameter: comma-separated relation names.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct IncludeQuery {
    /// Raw comma-separated list.
    pub include: Option<String>,
}

impl IncludeQuery {
    /// Non-empty, trimmed relation names in request order.
    pub fn names(&self) -> Vec<String> {
        self.include
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Paging query parameters.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PageQuery {
    /// Page number (1-based, default: 1).
    #[serde(default = "default_page_number")]
    #[validate(range(min = 1, message = "page_number must be at least 1"))]
    pub page_number: u64,
    /// Items per page; configured default when absent.
    #[validate(range(min = 1, message = "page_size must be at least 1"))]
    pub page_size: Option<u64>,
}

impl PageQuery {
    /// Requested page size, defaulted and capped by configuration.
    pub fn page_size(&self, config: &PaginationConfig) -> u64 {
        resolve_page_size(self.page_size, config)
    }
}

/// One filter as sent by callers.
///
/// The operator stays a string until [`FilterInput::into_descriptor`] so an
/// unknown operator surfaces as its own error rather than a JSON error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterInput {
    /// Property to test.
    #[serde(default, alias = "property_name")]
    pub property_name: String,
    /// Operator symbol or name; equality when absent.
    #[serde(default)]
    pub operator: Option<String>,
    /// Comparison value.
    #[serde(default)]
    pub value: serde_json::Value,
}

impl FilterInput {
    /// Parse the operator and build a descriptor.
    pub fn into_descriptor(self) -> AppResult<FilterDescriptor> {
        let operator = match self.operator.as_deref() {
            Some(op) => op.parse::<FilterOperator>()?,
            None => FilterOperator::default(),
        };
        Ok(FilterDescriptor::new(self.property_name, operator, self.value))
    }
}

/// Body of `POST /filter`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    /// Conjunctive filters.
    #[serde(default)]
    pub filters: Vec<FilterInput>,
    /// Sort code: 1 ascending, 2 descending, anything else unordered.
    #[serde(default = "default_order")]
    pub order: i32,
}

impl FilterRequest {
    /// Parse every filter, failing on the first unsupported operator.
    pub fn descriptors(self) -> AppResult<Vec<FilterDescriptor>> {
        into_descriptors(self.filters)
    }
}

/// Body of `POST /filter/paged`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FilterPageRequest {
    /// Conjunctive filters.
    #[serde(default)]
    pub filters: Vec<FilterInput>,
    /// Sort code: 1 ascending, 2 descending, anything else unordered.
    #[serde(default = "default_order")]
    pub order: i32,
    /// Page number (1-based, default: 1).
    #[serde(default = "default_page_number", alias = "page_number")]
    #[validate(range(min = 1, message = "pageNumber must be at least 1"))]
    pub page_number: u64,
    /// Items per page; configured default when absent.
    #[serde(default, alias = "page_size")]
    #[validate(range(min = 1, message = "pageSize must be at least 1"))]
    pub page_size: Option<u64>,
}

impl FilterPageRequest {
    /// Requested page size, defaulted and capped by configuration.
    pub fn resolved_page_size(&self, config: &PaginationConfig) -> u64 {
        resolve_page_size(self.page_size, config)
    }

    /// Parse every filter, failing on the first unsupported operator.
    pub fn descriptors(self) -> AppResult<Vec<FilterDescriptor>> {
        into_descriptors(self.filters)
    }
}

fn into_descriptors(filters: Vec<FilterInput>) -> AppResult<Vec<FilterDescriptor>> {
    filters.into_iter().map(FilterInput::into_descriptor).collect()
}

fn resolve_page_size(requested: Option<u64>, config: &PaginationConfig) -> u64 {
    requested
        .unwrap_or(config.default_page_size)
        .min(config.max_page_size)
}

fn default_page_number() -> u64 {
    1
}

fn default_order() -> i32 {
    SortOrder::ASC_CODE
}
