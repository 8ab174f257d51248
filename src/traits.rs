use crate::errors::ServiceResult;
use crate::models::{AddModel, DetailModel, FilterModel, ListModel, UpdateModel};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

/// Capability contract for models served through the CRUD controller.
///
/// A model has a UUID identifier, a default value, and round-trips through
/// JSON. The hook methods have no-op defaults; services use them for
/// filtering and bookkeeping when a model opts in.
pub trait ServiceModel:
    Clone + Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
    fn id(&self) -> Uuid;

    fn set_id(&mut self, id: Uuid);

    /// Creation timestamp matched against the filter's date window.
    /// Models without one are never excluded by date.
    #[must_use]
    fn created_at(&self) -> Option<DateTime<Utc>> {
        None
    }

    /// Active flag matched against the filter's status.
    /// Models without one are never excluded by status.
    #[must_use]
    fn is_active(&self) -> Option<bool> {
        None
    }

    /// Whether the model matches a non-empty, trimmed search term.
    #[must_use]
    fn matches_search(&self, term: &str) -> bool {
        let _ = term;
        true
    }

    /// Called by services right before a new record is stored.
    fn on_create(&mut self, now: DateTime<Utc>) {
        let _ = now;
    }

    /// Called by services before an update replaces `existing`. Fields set
    /// by [`ServiceModel::on_create`] are carried over here.
    fn on_update(&mut self, existing: &Self) {
        let _ = existing;
    }
}

/// The five operations the controller dispatches to.
///
/// Implementations are shared across concurrent requests and must do their
/// own locking. Failures are reported as [`ServiceError`](crate::errors::ServiceError)
/// variants; the controller decides the HTTP outcome.
#[async_trait]
pub trait CrudService<T: ServiceModel>: Send + Sync + 'static {
    async fn list(&self, filter: FilterModel) -> ServiceResult<ListModel<T>>;

    async fn detail(&self, id: Uuid) -> ServiceResult<DetailModel<T>>;

    /// Validates and stores `model.item`, returning it with any assigned id.
    async fn add(&self, model: AddModel<T>) -> ServiceResult<AddModel<T>>;

    /// Validates and replaces the record whose id is `model.item.id()`.
    async fn update(&self, model: UpdateModel<T>) -> ServiceResult<UpdateModel<T>>;

    async fn delete(&self, id: Uuid) -> ServiceResult<()>;
}
