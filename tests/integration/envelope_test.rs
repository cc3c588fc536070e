//! Integration tests for the response envelope and localization.

use std::collections::HashMap;

use axum::http::StatusCode;
use serde_json::{Value, json};

use crudkit_core::config::AppConfig;

use crate::helpers::TestApp;

fn french_app() -> TestApp {
    let mut config = AppConfig::default();
    let mut fr = HashMap::new();
    fr.insert("404".to_string(), "Ressource introuvable".to_string());
    fr.insert("200".to_string(), "Succès".to_string());
    config.localization.catalogs.insert("fr".to_string(), fr);
    TestApp::with_config(config)
}

#[tokio::test]
async fn test_health_passes_through_unchanged() {
    let app = TestApp::new();

    let response = app.get("/api/health").await;

    assert_eq!(response.status, StatusCode::OK);
    let expected = json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "backend": "memory"
    });
    assert_eq!(response.body, expected);
    assert!(response.body.get("success").is_none());
}

#[tokio::test]
async fn test_error_body_is_rewritten() {
    let app = TestApp::new();

    let response = app.get("/api/pokemon/paged?page_number=0").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let body = response.body.as_object().expect("object body");
    assert_eq!(body["message"], json!("The request was invalid"));
    assert_eq!(body["status"], json!(400));
    assert_eq!(body["success"], json!(false));
    assert!(body.contains_key("detail"));
}

#[tokio::test]
async fn test_accept_language_selects_catalog() {
    let app = french_app();

    let missing = app
        .request("GET", "/api/pokemon/99", None, &[("Accept-Language", "fr-FR, en;q=0.5")])
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["message"], json!("Ressource introuvable"));

    let found = app
        .request("GET", "/api/pokemon/1", None, &[("Accept-Language", "fr")])
        .await;
    assert_eq!(found.body["message"], json!("Succès"));
}

#[tokio::test]
async fn test_missing_catalog_entry_falls_back_to_default_language() {
    let app = french_app();

    let response = app
        .request("GET", "/api/pokemon/0", None, &[("Accept-Language", "fr")])
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], json!("The request was invalid"));
}

#[tokio::test]
async fn test_unknown_route_keeps_empty_body() {
    let app = TestApp::new();

    let response = app.get("/api/digimon").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.raw.is_empty());
    assert_eq!(response.body, Value::Null);
}
