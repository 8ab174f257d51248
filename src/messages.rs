//! Localized user-facing strings.
//!
//! Only the handful of strings the controller and the validation rules emit
//! live here: the "record not found" message, the "field is empty" template
//! and the labels of the fields the bundled rules know about. Unknown label
//! keys fall back to the key itself.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Supported message tables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Tr,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en-gb" => Ok(Self::En),
            "tr" | "tr-tr" => Ok(Self::Tr),
            other => Err(format!("unsupported locale '{other}'")),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::En => write!(f, "en"),
            Self::Tr => write!(f, "tr"),
        }
    }
}

/// Message lookup bound to one locale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Messages {
    locale: Locale,
}

impl Messages {
    #[must_use]
    pub const fn new(locale: Locale) -> Self {
        Self { locale }
    }

    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    #[must_use]
    pub const fn record_not_found(&self) -> &'static str {
        match self.locale {
            Locale::En => "Record not found.",
            Locale::Tr => "Kayıt bulunamadı.",
        }
    }

    #[must_use]
    pub const fn record_added(&self) -> &'static str {
        match self.locale {
            Locale::En => "Record added.",
            Locale::Tr => "Kayıt eklendi.",
        }
    }

    #[must_use]
    pub const fn record_updated(&self) -> &'static str {
        match self.locale {
            Locale::En => "Record updated.",
            Locale::Tr => "Kayıt güncellendi.",
        }
    }

    /// Formats the "field must not be empty" message for an already localized label.
    #[must_use]
    pub fn field_is_empty(&self, label: &str) -> String {
        match self.locale {
            Locale::En => format!("{label} must not be empty"),
            Locale::Tr => format!("{label} alanı boş olamaz"),
        }
    }

    /// Resolves a dictionary key (e.g. `"code"`) to its display label.
    #[must_use]
    pub fn label<'a>(&self, key: &'a str) -> &'a str {
        let found = match (self.locale, key) {
            (Locale::En, "code") => "Code",
            (Locale::En, "name") => "Name",
            (Locale::En, "description") => "Description",
            (Locale::Tr, "code") => "Kod",
            (Locale::Tr, "name") => "Ad",
            (Locale::Tr, "description") => "Açıklama",
            _ => return key,
        };
        found
    }
}
