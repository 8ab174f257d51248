//! Process-local [`CrudService`] implementation.
//!
//! Records are kept in insertion order behind a `RwLock`. Validation rules run
//! before every add and update; delete guards can veto a delete with an
//! invalid-transaction message, standing in for referential constraints.

use crate::errors::{ServiceError, ServiceResult};
use crate::messages::Messages;
use crate::models::{AddModel, DetailModel, FilterModel, ListModel, Paging, UpdateModel};
use crate::traits::{CrudService, ServiceModel};
use crate::validation::{NoRules, ValidationRules};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

type DeleteGuard<T> = Box<dyn Fn(&T) -> Option<String> + Send + Sync>;

pub struct InMemoryService<T> {
    records: RwLock<Vec<T>>,
    rules: Box<dyn ValidationRules<T>>,
    guards: Vec<DeleteGuard<T>>,
    messages: Messages,
}

impl<T: ServiceModel> InMemoryService<T> {
    #[must_use]
    pub fn new(messages: Messages) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            rules: Box::new(NoRules),
            guards: Vec::new(),
            messages,
        }
    }

    #[must_use]
    pub fn with_rules(mut self, rules: impl ValidationRules<T> + 'static) -> Self {
        self.rules = Box::new(rules);
        self
    }

    /// Adds a check run before every delete. Returning `Some(message)` aborts
    /// the delete with [`ServiceError::InvalidTransaction`].
    #[must_use]
    pub fn with_delete_guard<F>(mut self, guard: F) -> Self
    where
        F: Fn(&T) -> Option<String> + Send + Sync + 'static,
    {
        self.guards.push(Box::new(guard));
        self
    }

    /// Seeds the store without validation.
    #[must_use]
    pub fn with_records(self, records: impl IntoIterator<Item = T>) -> Self {
        {
            let mut store = self.records.write().unwrap_or_else(PoisonError::into_inner);
            store.extend(records);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn validate(&self, item: &T) -> ServiceResult<()> {
        self.rules
            .check(item, &self.messages)
            .into_result()
            .map_err(ServiceError::from)
    }

    fn not_found(&self) -> ServiceError {
        ServiceError::not_found(self.messages.record_not_found())
    }
}

fn poisoned<E>(_: PoisonError<E>) -> ServiceError {
    ServiceError::unclassified("record store lock poisoned")
}

fn admits<T: ServiceModel>(filter: &FilterModel, item: &T) -> bool {
    let in_window = item.created_at().is_none_or(|at| filter.covers(at));
    let status = item.is_active().is_none_or(|active| filter.status.admits(active));
    let search = filter.search_term().is_none_or(|term| item.matches_search(term));
    in_window && status && search
}

#[async_trait]
impl<T: ServiceModel> CrudService<T> for InMemoryService<T> {
    async fn list(&self, filter: FilterModel) -> ServiceResult<ListModel<T>> {
        if filter.page_size == 0 {
            return Err(ServiceError::unclassified("page size must be positive"));
        }
        let records = self.records.read().map_err(poisoned)?;
        let matching: Vec<&T> = records.iter().filter(|item| admits(&filter, *item)).collect();
        let total = matching.len() as u64;

        let offset = usize::try_from(filter.offset()).unwrap_or(usize::MAX);
        let size = usize::try_from(filter.page_size).unwrap_or(usize::MAX);
        let items = matching.into_iter().skip(offset).take(size).cloned().collect();

        Ok(ListModel::new(items, Paging::for_filter(&filter, total)))
    }

    async fn detail(&self, id: Uuid) -> ServiceResult<DetailModel<T>> {
        let records = self.records.read().map_err(poisoned)?;
        records
            .iter()
            .find(|item| item.id() == id)
            .cloned()
            .map(|item| DetailModel { item })
            .ok_or_else(|| self.not_found())
    }

    async fn add(&self, model: AddModel<T>) -> ServiceResult<AddModel<T>> {
        let mut item = model.item;
        self.validate(&item)?;

        if item.id().is_nil() {
            item.set_id(Uuid::new_v4());
        }
        item.on_create(Utc::now());

        let mut records = self.records.write().map_err(poisoned)?;
        if records.iter().any(|existing| existing.id() == item.id()) {
            return Err(ServiceError::unclassified(format!(
                "a record with id {} already exists",
                item.id()
            )));
        }
        records.push(item.clone());

        Ok(AddModel {
            item,
            message: self.messages.record_added().to_string(),
        })
    }

    async fn update(&self, model: UpdateModel<T>) -> ServiceResult<UpdateModel<T>> {
        let mut item = model.item;
        self.validate(&item)?;

        let mut records = self.records.write().map_err(poisoned)?;
        let slot = records
            .iter_mut()
            .find(|existing| existing.id() == item.id())
            .ok_or_else(|| self.not_found())?;
        item.on_update(slot);
        *slot = item.clone();

        Ok(UpdateModel {
            item,
            message: self.messages.record_updated().to_string(),
        })
    }

    async fn delete(&self, id: Uuid) -> ServiceResult<()> {
        let mut records = self.records.write().map_err(poisoned)?;
        let index = records
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| self.not_found())?;

        if let Some(reason) = self.guards.iter().find_map(|guard| guard(&records[index])) {
            return Err(ServiceError::InvalidTransaction(reason));
        }

        records.remove(index);
        Ok(())
    }
}
