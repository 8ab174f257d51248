use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::{IntoParams, ToSchema};

/// Record status filter.
///
/// Serialized by name; [`StatusOption::code`] gives the numeric value stored
/// by legacy clients.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum StatusOption {
    #[default]
    All,
    Active,
    Passive,
}

impl StatusOption {
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::All => 0,
            Self::Active => 1,
            Self::Passive => 2,
        }
    }

    /// Whether a record with the given active flag passes this filter.
    #[must_use]
    pub const fn admits(self, is_active: bool) -> bool {
        match self {
            Self::All => true,
            Self::Active => is_active,
            Self::Passive => !is_active,
        }
    }
}

impl fmt::Display for StatusOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Passive => "Passive",
        };
        f.write_str(name)
    }
}

/// Query criteria handed to [`CrudService::list`](crate::traits::CrudService::list).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterModel {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: StatusOption,
    /// 1-based page number.
    pub page_number: u64,
    pub page_size: u64,
    pub search_text: String,
}

impl FilterModel {
    /// Zero-based offset of the first item on the requested page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.page_number.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Trimmed search term, `None` when blank.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        let term = self.search_text.trim();
        (!term.is_empty()).then_some(term)
    }

    /// Whether `at` falls inside the inclusive date window.
    #[must_use]
    pub fn covers(&self, at: DateTime<Utc>) -> bool {
        self.start_date <= at && at <= self.end_date
    }
}

/// Query parameters accepted by the list endpoint when overrides are enabled.
///
/// Every field is optional; absent fields keep the configured default.
#[derive(Clone, Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FilterQuery {
    /// Start of the date window (RFC 3339).
    pub start_date: Option<DateTime<Utc>>,
    /// End of the date window (RFC 3339).
    pub end_date: Option<DateTime<Utc>>,
    /// `All`, `Active` or `Passive`.
    pub status: Option<StatusOption>,
    /// 1-based page number.
    #[param(example = 1)]
    pub page_number: Option<u64>,
    #[param(example = 10)]
    pub page_size: Option<u64>,
    pub search_text: Option<String>,
}

impl FilterQuery {
    /// Applies the present fields on top of `filter`.
    #[must_use]
    pub fn apply(self, mut filter: FilterModel) -> FilterModel {
        if let Some(start) = self.start_date {
            filter.start_date = start;
        }
        if let Some(end) = self.end_date {
            filter.end_date = end;
        }
        if let Some(status) = self.status {
            filter.status = status;
        }
        if let Some(page) = self.page_number {
            filter.page_number = page.max(1);
        }
        if let Some(size) = self.page_size {
            filter.page_size = size.max(1);
        }
        if let Some(search) = self.search_text {
            filter.search_text = search;
        }
        filter
    }
}

/// Paging metadata attached to a successful list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    pub page_number: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl Paging {
    #[must_use]
    pub fn new(page_number: u64, page_size: u64, total_items: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total_items.div_ceil(page_size)
        };
        Self {
            page_number,
            page_size,
            total_items,
            total_pages,
        }
    }

    /// Paging for a filter's page.
    #[must_use]
    pub fn for_filter(filter: &FilterModel, total_items: u64) -> Self {
        Self::new(filter.page_number, filter.page_size, total_items)
    }
}

/// Paged query result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListModel<T> {
    pub items: Vec<T>,
    pub has_error: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<Paging>,
}

impl<T> ListModel<T> {
    #[must_use]
    pub fn new(items: Vec<T>, paging: Paging) -> Self {
        Self {
            items,
            has_error: false,
            message: String::new(),
            paging: Some(paging),
        }
    }

    /// An empty list flagged as failed.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            has_error: true,
            message: message.into(),
            paging: None,
        }
    }
}

impl<T> Default for ListModel<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            has_error: false,
            message: String::new(),
            paging: None,
        }
    }
}

/// Single-item fetch result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailModel<T> {
    pub item: T,
}

/// Create request and response envelope.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddModel<T> {
    pub item: T,
    #[serde(default)]
    pub message: String,
}

/// Update request and response envelope. The record is identified by the item's id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateModel<T> {
    pub item: T,
    #[serde(default)]
    pub message: String,
}

/// Subtracts whole years from `at`, clamping Feb 29 to Feb 28.
#[must_use]
pub fn years_before(at: DateTime<Utc>, years: u32) -> DateTime<Utc> {
    at.checked_sub_months(Months::new(years.saturating_mul(12)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
