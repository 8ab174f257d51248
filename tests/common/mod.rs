#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use crudfacade::product::{ProductModel, ProductValidationRules};
use crudfacade::{
    AddModel, CrudConfig, CrudService, CrudState, DetailModel, FilterModel, InMemoryService,
    ListModel, Messages, ServiceError, ServiceResult, UpdateModel, crud_router,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

pub mod migration;

/// Service that records the filter it was given and fails every call with a
/// preset error, if one is set.
#[derive(Default)]
pub struct ScriptedService {
    pub failure: Mutex<Option<ServiceError>>,
    pub last_filter: Mutex<Option<FilterModel>>,
}

impl ScriptedService {
    pub fn failing(err: ServiceError) -> Self {
        Self {
            failure: Mutex::new(Some(err)),
            last_filter: Mutex::new(None),
        }
    }

    fn outcome(&self) -> ServiceResult<()> {
        match self.failure.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CrudService<ProductModel> for ScriptedService {
    async fn list(&self, filter: FilterModel) -> ServiceResult<ListModel<ProductModel>> {
        *self.last_filter.lock().unwrap() = Some(filter);
        self.outcome()?;
        Ok(ListModel::default())
    }

    async fn detail(&self, id: Uuid) -> ServiceResult<DetailModel<ProductModel>> {
        self.outcome()?;
        Ok(DetailModel {
            item: ProductModel {
                id,
                ..ProductModel::default()
            },
        })
    }

    async fn add(&self, model: AddModel<ProductModel>) -> ServiceResult<AddModel<ProductModel>> {
        self.outcome()?;
        Ok(model)
    }

    async fn update(
        &self,
        model: UpdateModel<ProductModel>,
    ) -> ServiceResult<UpdateModel<ProductModel>> {
        self.outcome()?;
        Ok(model)
    }

    async fn delete(&self, _id: Uuid) -> ServiceResult<()> {
        self.outcome()
    }
}

pub fn product_service() -> InMemoryService<ProductModel> {
    InMemoryService::new(Messages::default()).with_rules(ProductValidationRules::new())
}

pub fn setup_app<S>(service: S) -> Router
where
    S: CrudService<ProductModel>,
{
    setup_app_with_config(service, CrudConfig::default())
}

pub fn setup_app_with_config<S>(service: S, config: CrudConfig) -> Router
where
    S: CrudService<ProductModel>,
{
    crud_router(CrudState::<ProductModel, S>::new("products", service, config))
}

/// Router over a service the test keeps a handle to.
pub fn setup_shared_app<S>(service: Arc<S>) -> Router
where
    S: CrudService<ProductModel>,
{
    crud_router(CrudState::<ProductModel, S>::from_shared(
        "products",
        service,
        CrudConfig::default(),
    ))
}

pub fn product_json(code: &str, name: &str) -> Value {
    serde_json::json!({
        "item": {
            "code": code,
            "name": name,
            "isActive": true,
        }
    })
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = body_bytes(response).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}
