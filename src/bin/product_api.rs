//! Product CRUD API
//!
//! ```bash
//! cargo run --features server --bin product_api
//! ```
//!
//! Then visit <http://localhost:3000/products>. With `DATABASE_URL` set the
//! products live in that database, otherwise in memory.

use crudfacade::product::{ProductModel, ProductValidationRules, entity};
use crudfacade::{CrudConfig, CrudState, InMemoryService, SeaOrmService, crud_router};
use sea_orm::{ConnectionTrait, Database, Schema};
use std::env;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const RESOURCE: &str = "products";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crudfacade=debug,product_api=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().compact())
        .init();

    let config = CrudConfig::from_env()?;
    let messages = config.messages();
    tracing::info!(locale = %config.locale, page_size = config.list.page_size, "loaded configuration");

    let router = match env::var("DATABASE_URL") {
        Ok(database_url) => {
            let db = Database::connect(&database_url).await?;
            let backend = db.get_database_backend();
            let mut table = Schema::new(backend).create_table_from_entity(entity::Entity);
            table.if_not_exists();
            db.execute(backend.build(&table)).await?;
            tracing::info!("using database-backed product service");

            let service = SeaOrmService::<ProductModel>::new(db, messages)
                .with_rules(ProductValidationRules::new());
            crud_router(CrudState::<ProductModel, _>::new(RESOURCE, service, config))
        }
        Err(_) => {
            tracing::info!("DATABASE_URL not set, using in-memory product service");
            let service =
                InMemoryService::<ProductModel>::new(messages).with_rules(ProductValidationRules::new());
            crud_router(CrudState::<ProductModel, _>::new(RESOURCE, service, config))
        }
    };

    let app = router.layer(TraceLayer::new_for_http());

    let address = env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(%address, "serving /{RESOURCE}");
    axum::serve(listener, app).await?;
    Ok(())
}
