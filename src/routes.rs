//! Generic CRUD handlers and the router that mounts them.
//!
//! | Method | Path                | Service call |
//! |--------|---------------------|--------------|
//! | GET    | `/{resource}`       | `list`       |
//! | GET    | `/{resource}/{id}`  | `detail`     |
//! | POST   | `/{resource}`       | `add`        |
//! | PUT    | `/{resource}`       | `update`     |
//! | DELETE | `/{resource}/{id}`  | `delete`     |
//!
//! Every failure ends in a response here; nothing is rethrown.

use crate::config::CrudConfig;
use crate::errors::{ApiError, ServiceError};
use crate::models::{AddModel, DetailModel, FilterModel, FilterQuery, ListModel, UpdateModel};
use crate::pagination::calculate_content_range;
use crate::traits::{CrudService, ServiceModel};
use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use std::marker::PhantomData;
use std::sync::Arc;
use uuid::Uuid;

/// Shared handler state: the service and the controller configuration.
pub struct CrudState<T, S> {
    service: Arc<S>,
    config: Arc<CrudConfig>,
    resource: Arc<str>,
    _model: PhantomData<fn() -> T>,
}

impl<T, S> Clone for CrudState<T, S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            config: Arc::clone(&self.config),
            resource: Arc::clone(&self.resource),
            _model: PhantomData,
        }
    }
}

impl<T, S> CrudState<T, S>
where
    T: ServiceModel,
    S: CrudService<T>,
{
    pub fn new(resource: &str, service: S, config: CrudConfig) -> Self {
        Self::from_shared(resource, Arc::new(service), config)
    }

    pub fn from_shared(resource: &str, service: Arc<S>, config: CrudConfig) -> Self {
        Self {
            service,
            config: Arc::new(config),
            resource: Arc::from(resource.trim_matches('/')),
            _model: PhantomData,
        }
    }

    #[must_use]
    pub fn service(&self) -> &S {
        &self.service
    }

    #[must_use]
    pub fn config(&self) -> &CrudConfig {
        &self.config
    }

    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Filter for a list request: the configured defaults, plus the query
    /// string when overrides are enabled.
    fn list_filter(
        &self,
        query: Result<Query<FilterQuery>, QueryRejection>,
    ) -> Result<FilterModel, String> {
        let defaults = &self.config.list;
        let filter = defaults.filter();
        if !defaults.allow_query_overrides {
            return Ok(filter);
        }
        match query {
            Ok(Query(query)) => Ok(query.apply(filter)),
            Err(rejection) => Err(rejection.body_text()),
        }
    }
}

/// Builds a router serving `/{resource}` and `/{resource}/{id}`.
///
/// ```rust,ignore
/// let app = crud_router(CrudState::new("products", service, CrudConfig::default()));
/// ```
pub fn crud_router<T, S>(state: CrudState<T, S>) -> Router
where
    T: ServiceModel,
    S: CrudService<T>,
{
    let collection = format!("/{}", state.resource());
    let member = format!("/{}/{{id}}", state.resource());

    Router::new()
        .route(
            &collection,
            get(list::<T, S>).post(add::<T, S>).put(update::<T, S>),
        )
        .route(&member, get(detail::<T, S>).delete(delete::<T, S>))
        .with_state(state)
}

/// `GET /{resource}`: 200 with the list envelope, 400 with a failed envelope.
pub async fn list<T, S>(
    State(state): State<CrudState<T, S>>,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Response
where
    T: ServiceModel,
    S: CrudService<T>,
{
    let filter = match state.list_filter(query) {
        Ok(filter) => filter,
        Err(message) => {
            tracing::debug!(resource = %state.resource(), %message, "rejected list query");
            return (StatusCode::BAD_REQUEST, Json(ListModel::<T>::failed(message))).into_response();
        }
    };

    match state.service().list(filter).await {
        Ok(model) => {
            let headers = model
                .paging
                .map(|paging| {
                    calculate_content_range(
                        paging.page_number.saturating_sub(1).saturating_mul(paging.page_size),
                        paging.page_size,
                        paging.total_items,
                        state.resource(),
                    )
                })
                .unwrap_or_default();
            (StatusCode::OK, headers, Json(model)).into_response()
        }
        Err(err) => {
            log_failure(state.resource(), "list", &err);
            (StatusCode::BAD_REQUEST, Json(ListModel::<T>::failed(err.to_string()))).into_response()
        }
    }
}

/// `GET /{resource}/{id}`: 404 when the record is missing, 400 otherwise.
///
/// # Errors
///
/// - `NotFound` → 404 with the localized not-found string.
/// - anything else → 400 with the error description under `ErrorMessage`.
pub async fn detail<T, S>(
    State(state): State<CrudState<T, S>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DetailModel<T>>, ApiError>
where
    T: ServiceModel,
    S: CrudService<T>,
{
    match state.service().detail(id).await {
        Ok(model) => Ok(Json(model)),
        Err(ServiceError::NotFound(_)) => Err(ApiError::NotFound(
            state.config().messages().record_not_found().to_string(),
        )),
        Err(err) => {
            log_failure(state.resource(), "detail", &err);
            Err(ApiError::generic(format!("{}: {err}", err.kind())))
        }
    }
}

/// `POST /{resource}`
///
/// # Errors
///
/// - `Validation` → 400 with one entry per field.
/// - anything else → 400 with the raw message under `ErrorMessage`.
pub async fn add<T, S>(
    State(state): State<CrudState<T, S>>,
    Json(model): Json<AddModel<T>>,
) -> Result<Json<AddModel<T>>, ApiError>
where
    T: ServiceModel,
    S: CrudService<T>,
{
    match state.service().add(model).await {
        Ok(added) => Ok(Json(added)),
        Err(ServiceError::Validation(errors)) => Err(ApiError::validation(errors)),
        Err(err) => {
            log_failure(state.resource(), "add", &err);
            Err(ApiError::generic(err.to_string()))
        }
    }
}

/// `PUT /{resource}`
///
/// # Errors
///
/// - `Validation` → 400 with one entry per field.
/// - `NotFound` → 400 (not 404) with the localized not-found message.
/// - anything else → 400 with the raw message under `ErrorMessage`.
pub async fn update<T, S>(
    State(state): State<CrudState<T, S>>,
    Json(model): Json<UpdateModel<T>>,
) -> Result<Json<UpdateModel<T>>, ApiError>
where
    T: ServiceModel,
    S: CrudService<T>,
{
    match state.service().update(model).await {
        Ok(updated) => Ok(Json(updated)),
        Err(ServiceError::Validation(errors)) => Err(ApiError::validation(errors)),
        Err(ServiceError::NotFound(_)) => Err(ApiError::generic(
            state.config().messages().record_not_found(),
        )),
        Err(err) => {
            log_failure(state.resource(), "update", &err);
            Err(ApiError::generic(err.to_string()))
        }
    }
}

/// `DELETE /{resource}/{id}`: 200 with an empty body.
///
/// # Errors
///
/// - `InvalidTransaction` → 400 with its own message.
/// - anything else → 400 with the localized not-found message, whatever the
///   cause. The cause is only visible in the logs.
pub async fn delete<T, S>(
    State(state): State<CrudState<T, S>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
    T: ServiceModel,
    S: CrudService<T>,
{
    match state.service().delete(id).await {
        Ok(()) => Ok(StatusCode::OK),
        Err(ServiceError::InvalidTransaction(message)) => Err(ApiError::generic(message)),
        Err(err) => {
            tracing::warn!(
                resource = %state.resource(),
                %id,
                kind = err.kind(),
                error = %err,
                "delete failed, answering with not-found fallback"
            );
            Err(ApiError::generic(state.config().messages().record_not_found()))
        }
    }
}

fn log_failure(resource: &str, operation: &'static str, err: &ServiceError) {
    match err {
        ServiceError::Unclassified(_) => {
            tracing::error!(resource, operation, error = %err, "service call failed");
        }
        _ => {
            tracing::debug!(resource, operation, kind = err.kind(), error = %err, "service call rejected");
        }
    }
}
