use crate::messages::{Locale, Messages};
use crate::models::{FilterModel, StatusOption, years_before};
use chrono::{DateTime, Utc};

/// Invalid configuration value.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Defaults used by the list endpoint to build its filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDefaults {
    /// Length of the trailing date window, ending now.
    pub window_years: u32,
    pub status: StatusOption,
    pub page_number: u64,
    pub page_size: u64,
    pub search_text: String,
    /// Let clients override the defaults through query parameters.
    pub allow_query_overrides: bool,
}

impl Default for ListDefaults {
    fn default() -> Self {
        Self {
            window_years: 2,
            status: StatusOption::All,
            page_number: 1,
            page_size: 10,
            search_text: String::new(),
            allow_query_overrides: false,
        }
    }
}

impl ListDefaults {
    /// The default filter as of `now`.
    #[must_use]
    pub fn filter_at(&self, now: DateTime<Utc>) -> FilterModel {
        FilterModel {
            start_date: years_before(now, self.window_years),
            end_date: now,
            status: self.status,
            page_number: self.page_number,
            page_size: self.page_size,
            search_text: self.search_text.clone(),
        }
    }

    #[must_use]
    pub fn filter(&self) -> FilterModel {
        self.filter_at(Utc::now())
    }
}

/// Controller configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrudConfig {
    pub locale: Locale,
    pub list: ListDefaults,
}

impl CrudConfig {
    #[must_use]
    pub fn messages(&self) -> Messages {
        Messages::new(self.locale)
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default |
    /// |-----------------------------|---------|
    /// | `CRUD_LOCALE`               | `en`    |
    /// | `CRUD_LIST_WINDOW_YEARS`    | `2`     |
    /// | `CRUD_LIST_PAGE_SIZE`       | `10`    |
    /// | `CRUD_LIST_QUERY_OVERRIDES` | `false` |
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first variable that fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`CrudConfig::from_env`], reading from an arbitrary source.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first variable that fails to parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("CRUD_LOCALE") {
            config.locale = value.parse().map_err(|_| ConfigError::Invalid {
                var: "CRUD_LOCALE",
                expected: "one of en, tr",
                value,
            })?;
        }

        if let Some(value) = lookup("CRUD_LIST_WINDOW_YEARS") {
            config.list.window_years = value.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "CRUD_LIST_WINDOW_YEARS",
                expected: "a non-negative integer",
                value,
            })?;
        }

        if let Some(value) = lookup("CRUD_LIST_PAGE_SIZE") {
            let parsed = value.trim().parse::<u64>();
            config.list.page_size = match parsed {
                Ok(size) if size > 0 => size,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "CRUD_LIST_PAGE_SIZE",
                        expected: "a positive integer",
                        value,
                    });
                }
            };
        }

        if let Some(value) = lookup("CRUD_LIST_QUERY_OVERRIDES") {
            config.list.allow_query_overrides = parse_bool(&value).ok_or_else(|| ConfigError::Invalid {
                var: "CRUD_LIST_QUERY_OVERRIDES",
                expected: "true or false",
                value: value.clone(),
            })?;
        }

        Ok(config)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
