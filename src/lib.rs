pub mod config;
pub mod errors;
pub mod memory;
pub mod messages;
pub mod models;
pub mod pagination;
pub mod product;
pub mod routes;
pub mod seaorm;
pub mod traits;
pub mod validation;

pub use config::{ConfigError, CrudConfig, ListDefaults};
pub use errors::{ApiError, ModelState, ServiceError, ServiceResult};
pub use memory::InMemoryService;
pub use messages::{Locale, Messages};
pub use models::{AddModel, DetailModel, FilterModel, ListModel, StatusOption, UpdateModel};
pub use routes::{CrudState, crud_router};
pub use seaorm::{SeaOrmModel, SeaOrmService};
pub use traits::{CrudService, ServiceModel};
pub use validation::{RuleSet, ValidationRules};
