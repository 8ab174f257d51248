//! End-to-end flows through the router backed by the in-memory service.

use axum::http::StatusCode;
use crudfacade::product::ProductModel;
use serde_json::{Value, json};
use uuid::Uuid;

mod common;
use common::{body_bytes, body_json, product_json, product_service, send, setup_app};

async fn create(app: &axum::Router, code: &str, name: &str) -> Value {
    let response = send(app, "POST", "/products", Some(product_json(code, name))).await;
    let (status, body) = body_json(response).await;
    assert_eq!(status, StatusCode::OK, "create failed: {body}");
    body
}

#[tokio::test]
async fn test_add_then_detail() {
    let app = setup_app(product_service());

    let created = create(&app, "P-100", "Hex bolt").await;
    assert_eq!(created["message"], "Record added.");
    let id = created["item"]["id"].as_str().unwrap().to_string();
    assert_ne!(id, Uuid::nil().to_string());

    let (status, body) = body_json(send(&app, "GET", &format!("/products/{id}"), None).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item"]["code"], "P-100");
    assert_eq!(body["item"]["name"], "Hex bolt");
    assert_eq!(body["item"]["isActive"], true);
}

#[tokio::test]
async fn test_add_with_blank_fields_reports_both() {
    let app = setup_app(product_service());

    let response = send(&app, "POST", "/products", Some(product_json("", "  "))).await;
    let (status, body) = body_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let errors = body.as_object().unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(body["code"], json!(["Code must not be empty"]));
    assert_eq!(body["name"], json!(["Name must not be empty"]));
}

#[tokio::test]
async fn test_add_with_one_blank_field() {
    let app = setup_app(product_service());

    let response = send(&app, "POST", "/products", Some(product_json("P-1", ""))).await;
    let (status, body) = body_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"name": ["Name must not be empty"]}));
}

#[tokio::test]
async fn test_list_returns_paging_and_content_range() {
    let app = setup_app(product_service());
    for i in 0..12 {
        create(&app, &format!("P-{i:02}"), &format!("Item {i}")).await;
    }

    let response = send(&app, "GET", "/products", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let range = response
        .headers()
        .get("content-range")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    assert_eq!(range.as_deref(), Some("products 0-9/12"));

    let (_, body) = body_json(response).await;
    assert_eq!(body["hasError"], false);
    assert_eq!(body["items"].as_array().unwrap().len(), 10);
    assert_eq!(body["paging"]["totalItems"], 12);
    assert_eq!(body["paging"]["totalPages"], 2);
}

#[tokio::test]
async fn test_empty_list() {
    let app = setup_app(product_service());

    let (status, body) = body_json(send(&app, "GET", "/products", None).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["hasError"], false);
    assert_eq!(body["message"], "");
}

#[tokio::test]
async fn test_update_replaces_record() {
    let app = setup_app(product_service());
    let created = create(&app, "P-1", "Bolt").await;

    let mut item = created["item"].clone();
    item["name"] = json!("Carriage bolt");
    item["isActive"] = json!(false);
    let response = send(&app, "PUT", "/products", Some(json!({ "item": item }))).await;
    let (status, body) = body_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Record updated.");

    let id = item["id"].as_str().unwrap();
    let (_, body) = body_json(send(&app, "GET", &format!("/products/{id}"), None).await).await;
    assert_eq!(body["item"]["name"], "Carriage bolt");
    assert_eq!(body["item"]["isActive"], false);
}

#[tokio::test]
async fn test_update_without_created_at_keeps_record_listed() {
    let app = setup_app(product_service());
    let created = create(&app, "P-1", "Bolt").await;
    let id = created["item"]["id"].as_str().unwrap().to_string();

    let item = json!({"item": {"id": id, "code": "P-1", "name": "Bolt 2", "isActive": true}});
    let (status, body) = body_json(send(&app, "PUT", "/products", Some(item)).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item"]["createdAt"], created["item"]["createdAt"]);

    let (status, body) = body_json(send(&app, "GET", "/products", None).await).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Bolt 2");
}

#[tokio::test]
async fn test_update_unknown_record_is_400() {
    let app = setup_app(product_service());

    let item = json!({
        "item": {"id": Uuid::new_v4(), "code": "P-1", "name": "Bolt", "isActive": true}
    });
    let (status, body) = body_json(send(&app, "PUT", "/products", Some(item)).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"ErrorMessage": ["Record not found."]}));
}

#[tokio::test]
async fn test_update_validation_runs_before_lookup() {
    let app = setup_app(product_service());

    let item = json!({"item": {"id": Uuid::new_v4(), "code": "", "name": "Bolt"}});
    let (status, body) = body_json(send(&app, "PUT", "/products", Some(item)).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"code": ["Code must not be empty"]}));
}

#[tokio::test]
async fn test_delete_then_detail_is_404() {
    let app = setup_app(product_service());
    let created = create(&app, "P-1", "Bolt").await;
    let uri = format!("/products/{}", created["item"]["id"].as_str().unwrap());

    let response = send(&app, "DELETE", &uri, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_bytes(response).await.is_empty());

    let (status, body) = body_json(send(&app, "GET", &uri, None).await).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!("Record not found."));

    let (status, body) = body_json(send(&app, "DELETE", &uri, None).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"ErrorMessage": ["Record not found."]}));
}

#[tokio::test]
async fn test_delete_guard_message_reaches_client() {
    let service = product_service().with_delete_guard(|p: &ProductModel| {
        p.is_active
            .then(|| "active products cannot be deleted".to_string())
    });
    let app = setup_app(service);
    let created = create(&app, "P-1", "Bolt").await;
    let uri = format!("/products/{}", created["item"]["id"].as_str().unwrap());

    let (status, body) = body_json(send(&app, "DELETE", &uri, None).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"ErrorMessage": ["active products cannot be deleted"]})
    );

    let (status, _) = body_json(send(&app, "GET", &uri, None).await).await;
    assert_eq!(status, StatusCode::OK);
}
