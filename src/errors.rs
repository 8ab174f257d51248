//! # Error Handling for CRUD APIs
//!
//! Two layers:
//!
//! - [`ServiceError`]: what a [`CrudService`](crate::traits::CrudService)
//!   returns. Four variants, matched on by the controller.
//! - [`ApiError`]: what a handler returns. A status code plus a body, either a
//!   "model state" map (`{"field": ["message", ...]}`) or a bare JSON string.
//!
//! The controller is the only place a `ServiceError` becomes an `ApiError`;
//! see [`routes`](crate::routes) for the per-operation mapping.

use crate::validation::ValidationErrors;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use std::collections::BTreeMap;

/// Model-state key used for errors that are not tied to a field.
pub const GENERIC_ERROR_KEY: &str = "ErrorMessage";

/// Failure signalled by a CRUD service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// One or more fields failed validation.
    #[error("{0}")]
    Validation(ValidationErrors),

    /// The target record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The mutation would break a domain invariant, e.g. a referenced record.
    #[error("{0}")]
    InvalidTransaction(String),

    /// Anything else.
    #[error("{0}")]
    Unclassified(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn invalid_transaction(message: impl Into<String>) -> Self {
        Self::InvalidTransaction(message.into())
    }

    pub fn unclassified(message: impl Into<String>) -> Self {
        Self::Unclassified(message.into())
    }

    /// Short variant name, used as a log field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::InvalidTransaction(_) => "invalid_transaction",
            Self::Unclassified(_) => "unclassified",
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Convert `SeaORM` `DbErr` to `ServiceError`
///
/// - `RecordNotFound` / `RecordNotUpdated` → `NotFound`
/// - foreign key violations → `InvalidTransaction`
/// - everything else → `Unclassified`
impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        match &err {
            DbErr::RecordNotFound(msg) => Self::NotFound(msg.clone()),
            DbErr::RecordNotUpdated => Self::NotFound(err.to_string()),
            _ => match err.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(msg)) => Self::InvalidTransaction(msg),
                _ => Self::Unclassified(err.to_string()),
            },
        }
    }
}

/// Field → messages map returned as the body of 400 responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ModelState {
    entries: BTreeMap<String, Vec<String>>,
}

impl ModelState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.entries.entry(key.into()).or_default().push(message.into());
    }

    /// A model state holding a single generic error.
    #[must_use]
    pub fn generic(message: impl Into<String>) -> Self {
        let mut state = Self::new();
        state.add_error(GENERIC_ERROR_KEY, message);
        state
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<ValidationErrors> for ModelState {
    fn from(errors: ValidationErrors) -> Self {
        let mut state = Self::new();
        for error in errors {
            state.add_error(error.field, error.message);
        }
        state
    }
}

/// Handler-side error: status plus body.
#[derive(Debug)]
pub enum ApiError {
    /// 400 with a model-state body.
    BadRequest(ModelState),

    /// 404 with the message as a JSON string body.
    NotFound(String),
}

impl ApiError {
    /// 400 with `message` under the generic key.
    pub fn generic(message: impl Into<String>) -> Self {
        Self::BadRequest(ModelState::generic(message))
    }

    /// 400 with one entry per failing field.
    #[must_use]
    pub fn validation(errors: ValidationErrors) -> Self {
        Self::BadRequest(errors.into())
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            Self::BadRequest(state) => (status, Json(state)).into_response(),
            Self::NotFound(message) => (status, Json(message)).into_response(),
        }
    }
}
