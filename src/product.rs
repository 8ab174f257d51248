//! Sample product resource: model, validation rules and sea-orm entity.

use crate::messages::Messages;
use crate::models::StatusOption;
use crate::seaorm::{SeaOrmModel, contains_ignore_case};
use crate::traits::ServiceModel;
use crate::validation::{RuleSet, ValidationErrors, ValidationRules};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, ColumnTrait, Condition};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductModel {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl ServiceModel for ProductModel {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }

    fn is_active(&self) -> Option<bool> {
        Some(self.is_active)
    }

    fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.code.to_lowercase().contains(&term) || self.name.to_lowercase().contains(&term)
    }

    fn on_create(&mut self, now: DateTime<Utc>) {
        self.created_at = now;
    }

    fn on_update(&mut self, existing: &Self) {
        self.created_at = existing.created_at;
    }
}

/// `code` and `name` must not be empty.
pub struct ProductValidationRules {
    rules: RuleSet<ProductModel>,
}

impl ProductValidationRules {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: RuleSet::new()
                .not_empty("code", "code", |p: &ProductModel| &p.code)
                .not_empty("name", "name", |p: &ProductModel| &p.name),
        }
    }
}

impl Default for ProductValidationRules {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationRules<ProductModel> for ProductValidationRules {
    fn check(&self, model: &ProductModel, messages: &Messages) -> ValidationErrors {
        self.rules.check(model, messages)
    }
}

pub mod entity {
    use chrono::{DateTime, Utc};
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "products")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(unique)]
        pub code: String,
        pub name: String,
        #[sea_orm(column_type = "Text", nullable)]
        pub description: Option<String>,
        pub is_active: bool,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<entity::Model> for ProductModel {
    fn from(model: entity::Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            name: model.name,
            description: model.description,
            is_active: model.is_active,
            created_at: model.created_at,
        }
    }
}

impl From<ProductModel> for entity::ActiveModel {
    fn from(product: ProductModel) -> Self {
        Self {
            id: ActiveValue::Set(product.id),
            code: ActiveValue::Set(product.code),
            name: ActiveValue::Set(product.name),
            description: ActiveValue::Set(product.description),
            is_active: ActiveValue::Set(product.is_active),
            created_at: ActiveValue::Set(product.created_at),
        }
    }
}

impl SeaOrmModel for ProductModel {
    type Entity = entity::Entity;
    type ActiveModel = entity::ActiveModel;

    fn order_column() -> entity::Column {
        entity::Column::Code
    }

    fn date_column() -> Option<entity::Column> {
        Some(entity::Column::CreatedAt)
    }

    fn status_condition(status: StatusOption) -> Condition {
        match status {
            StatusOption::All => Condition::all(),
            StatusOption::Active => Condition::all().add(entity::Column::IsActive.eq(true)),
            StatusOption::Passive => Condition::all().add(entity::Column::IsActive.eq(false)),
        }
    }

    fn search_condition(term: &str) -> Condition {
        Condition::any()
            .add(contains_ignore_case(entity::Column::Code, term))
            .add(contains_ignore_case(entity::Column::Name, term))
    }
}
