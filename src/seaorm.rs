//! [`CrudService`] adapter over a sea-orm entity.
//!
//! A model opts in by implementing [`SeaOrmModel`]: it names its entity and
//! active model, converts from the entity's `Model` and into its
//! `ActiveModel`, and optionally exposes the columns the list filter uses.
//!
//! ```rust,ignore
//! let db = Database::connect("sqlite::memory:").await?;
//! let service = SeaOrmService::<ProductModel>::new(db, Messages::default())
//!     .with_rules(ProductValidationRules::new());
//! let app = crud_router(CrudState::new("products", service, CrudConfig::default()));
//! ```

use crate::errors::{ServiceError, ServiceResult};
use crate::messages::Messages;
use crate::models::{
    AddModel, DetailModel, FilterModel, ListModel, Paging, StatusOption, UpdateModel,
};
use crate::traits::{CrudService, ServiceModel};
use crate::validation::{NoRules, ValidationRules};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection,
    EntityTrait, IntoActiveModel, PaginatorTrait, PrimaryKeyTrait, QueryFilter, QueryOrder,
};
use std::marker::PhantomData;
use uuid::Uuid;

/// Binds a [`ServiceModel`] to a sea-orm entity.
pub trait SeaOrmModel: ServiceModel {
    type Entity: EntityTrait;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity>
        + ActiveModelBehavior
        + From<Self>
        + Send;

    /// Column used to order list results.
    fn order_column() -> <Self::Entity as EntityTrait>::Column;

    /// Column matched against the filter's date window, if any.
    #[must_use]
    fn date_column() -> Option<<Self::Entity as EntityTrait>::Column> {
        None
    }

    /// Condition selecting records for a status. Defaults to no restriction.
    #[must_use]
    fn status_condition(status: StatusOption) -> Condition {
        let _ = status;
        Condition::all()
    }

    /// Condition matching a non-empty, trimmed search term. Defaults to no restriction.
    #[must_use]
    fn search_condition(term: &str) -> Condition {
        let _ = term;
        Condition::all()
    }
}

fn escape_like_wildcards(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// `LOWER(column) LIKE '%term%'` with the term lower-cased and its wildcards
/// escaped, so matching is case-insensitive on every backend.
#[must_use]
pub fn contains_ignore_case<C: ColumnTrait>(column: C, term: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like_wildcards(&term.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(column.as_column_ref())))
        .like(LikeExpr::new(pattern).escape('\\'))
}

pub struct SeaOrmService<T> {
    db: DatabaseConnection,
    rules: Box<dyn ValidationRules<T>>,
    messages: Messages,
    _model: PhantomData<fn() -> T>,
}

impl<T: SeaOrmModel> SeaOrmService<T> {
    #[must_use]
    pub fn new(db: DatabaseConnection, messages: Messages) -> Self {
        Self {
            db,
            rules: Box::new(NoRules),
            messages,
            _model: PhantomData,
        }
    }

    #[must_use]
    pub fn with_rules(mut self, rules: impl ValidationRules<T> + 'static) -> Self {
        self.rules = Box::new(rules);
        self
    }

    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
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

    fn condition(filter: &FilterModel) -> Condition {
        let mut condition = Condition::all().add(T::status_condition(filter.status));
        if let Some(column) = T::date_column() {
            condition = condition
                .add(column.gte(filter.start_date))
                .add(column.lte(filter.end_date));
        }
        if let Some(term) = filter.search_term() {
            condition = condition.add(T::search_condition(term));
        }
        condition
    }
}

#[async_trait]
impl<T> CrudService<T> for SeaOrmService<T>
where
    T: SeaOrmModel + From<<T::Entity as EntityTrait>::Model>,
    <T::Entity as EntityTrait>::Model: IntoActiveModel<T::ActiveModel> + Send + Sync,
    <<T::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
    async fn list(&self, filter: FilterModel) -> ServiceResult<ListModel<T>> {
        if filter.page_size == 0 {
            return Err(ServiceError::unclassified("page size must be positive"));
        }
        let paginator = T::Entity::find()
            .filter(Self::condition(&filter))
            .order_by_asc(T::order_column())
            .paginate(&self.db, filter.page_size);

        let total = paginator.num_items().await?;
        let rows = paginator
            .fetch_page(filter.page_number.saturating_sub(1))
            .await?;
        let items = rows.into_iter().map(T::from).collect();

        Ok(ListModel::new(items, Paging::for_filter(&filter, total)))
    }

    async fn detail(&self, id: Uuid) -> ServiceResult<DetailModel<T>> {
        let model = T::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| self.not_found())?;
        Ok(DetailModel {
            item: T::from(model),
        })
    }

    async fn add(&self, model: AddModel<T>) -> ServiceResult<AddModel<T>> {
        let mut item = model.item;
        self.validate(&item)?;

        if item.id().is_nil() {
            item.set_id(Uuid::new_v4());
        }
        item.on_create(Utc::now());

        let active: T::ActiveModel = item.into();
        let saved = active.insert(&self.db).await?;

        Ok(AddModel {
            item: T::from(saved),
            message: self.messages.record_added().to_string(),
        })
    }

    async fn update(&self, model: UpdateModel<T>) -> ServiceResult<UpdateModel<T>> {
        let mut item = model.item;
        self.validate(&item)?;

        let existing = T::Entity::find_by_id(item.id())
            .one(&self.db)
            .await?
            .ok_or_else(|| self.not_found())?;
        item.on_update(&T::from(existing));

        let active: T::ActiveModel = item.into();
        let saved = active.update(&self.db).await?;

        Ok(UpdateModel {
            item: T::from(saved),
            message: self.messages.record_updated().to_string(),
        })
    }

    async fn delete(&self, id: Uuid) -> ServiceResult<()> {
        let result = T::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(self.not_found());
        }
        Ok(())
    }
}
