//! Integration tests for the generic entity endpoints.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_filter_by_owner() {
    let app = TestApp::new();

    let response = app
        .post(
            "/api/pokemon/filter",
            json!({
                "filters": [{ "propertyName": "Owner", "operator": "==", "value": "Ash Ketchum" }],
                "order": 1
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], json!(true));
    assert_eq!(response.body["status"], json!(200));
    assert_eq!(response.names(), vec!["Pikachu", "Squirtle"]);
}

#[tokio::test]
async fn test_filter_descending_by_level() {
    let app = TestApp::new();

    let response = app
        .post(
            "/api/pokemon/filter",
            json!({
                "filters": [{ "propertyName": "level", "operator": "gte", "value": 15 }],
                "order": 2
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.names(),
        vec!["Pikachu", "Butterfree", "Squirtle", "Bulbasaur"]
    );
}

#[tokio::test]
async fn test_filter_paged_reports_filtered_total() {
    let app = TestApp::new();

    let response = app
        .post(
            "/api/pokemon/filter/paged",
            json!({
                "filters": [{ "propertyName": "Owner", "value": "Ash Ketchum" }],
                "pageNumber": 1,
                "pageSize": 1
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["totalCount"], json!(2));
    assert_eq!(response.names(), vec!["Pikachu"]);
}

#[tokio::test]
async fn test_filter_without_matches_is_not_found() {
    let app = TestApp::new();

    let response = app
        .post(
            "/api/pokemon/filter",
            json!({ "filters": [{ "propertyName": "Owner", "value": "Gary Oak" }] }),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["success"], json!(false));
    assert_eq!(response.body["data"], json!([]));
}

#[tokio::test]
async fn test_unsupported_operator_is_bad_request() {
    let app = TestApp::new();

    let response = app
        .post(
            "/api/pokemon/filter",
            json!({ "filters": [{ "propertyName": "Name", "operator": "like", "value": "Pi%" }] }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], json!("UNSUPPORTED_OPERATOR"));
    assert_eq!(response.body["status"], json!(400));
    assert_eq!(response.body["message"], json!("The request was invalid"));
}

#[tokio::test]
async fn test_unknown_property_is_bad_request() {
    let app = TestApp::new();

    let response = app
        .post(
            "/api/pokemon/filter",
            json!({ "filters": [{ "propertyName": "Weight", "value": 6 }] }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], json!(false));
}

#[tokio::test]
async fn test_get_by_id_with_include() {
    let app = TestApp::new();

    let response = app.get("/api/pokemon/1?include=Trainer,Moves").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["name"], json!("Pikachu"));
    assert_eq!(response.body["data"]["trainerHometown"], json!("Pallet Town"));
}

#[tokio::test]
async fn test_get_by_id_without_include_omits_relation() {
    let app = TestApp::new();

    let response = app.get("/api/pokemon/2").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["data"].get("trainerHometown").is_none());
}

#[tokio::test]
async fn test_non_positive_id_is_bad_request() {
    let app = TestApp::new();

    let response = app.get("/api/pokemon/0").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["data"], json!(null));
}

#[tokio::test]
async fn test_missing_id_is_not_found() {
    let app = TestApp::new();

    let response = app.get("/api/pokemon/99").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.body["message"],
        json!("The requested resource was not found")
    );
}

#[tokio::test]
async fn test_get_paginated() {
    let app = TestApp::new();

    let response = app.get("/api/pokemon/paged?page_number=2&page_size=2").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["totalCount"], json!(5));
    assert_eq!(response.names(), vec!["Bulbasaur", "Squirtle"]);
}

#[tokio::test]
async fn test_zero_page_size_is_bad_request() {
    let app = TestApp::new();

    let response = app.get("/api/pokemon/paged?page_number=1&page_size=0").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], json!("VALIDATION"));
    assert_eq!(response.body["success"], json!(false));
}

#[tokio::test]
async fn test_create_update_delete() {
    let app = TestApp::new();

    let created = app
        .post(
            "/api/pokemon",
            json!({
                "name": "Mew",
                "owner": "Ash Ketchum",
                "element": "psychic",
                "level": 30,
                "trainerId": 1
            }),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK);
    let id = created.body["data"]["id"].as_i64().expect("assigned id");
    assert_eq!(id, 6);
    assert_eq!(app.pokemon.len().await, 6);

    let updated = app
        .request(
            "PUT",
            "/api/pokemon",
            Some(json!({
                "id": id,
                "name": "Mew",
                "owner": "Ash Ketchum",
                "element": "psychic",
                "level": 31,
                "caughtAt": "1998-01-01T00:00:00Z"
            })),
            &[],
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["data"]["level"], json!(31));

    let deleted = app
        .request("DELETE", &format!("/api/pokemon/{id}"), None, &[])
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["data"], json!(true));

    let again = app
        .request("DELETE", &format!("/api/pokemon/{id}"), None, &[])
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_with_negative_id_is_bad_request() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/pokemon",
            Some(json!({
                "id": -7,
                "name": "Missingno",
                "owner": "Nobody",
                "element": "normal",
                "level": 1
            })),
            &[],
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.pokemon.len().await, 5);
}

#[tokio::test]
async fn test_update_missing_is_not_found() {
    let app = TestApp::new();

    let response = app
        .request(
            "PUT",
            "/api/pokemon",
            Some(json!({
                "id": 42,
                "name": "Ditto",
                "owner": "Nobody",
                "element": "normal",
                "level": 1
            })),
            &[],
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = TestApp::new();

    let response = app
        .post("/api/pokemon", json!({ "name": 7 }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], json!("VALIDATION"));
}

#[tokio::test]
async fn test_trainer_routes() {
    let app = TestApp::new();

    let response = app.get("/api/trainers").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.names(), vec!["Ash Ketchum", "Misty", "Brock"]);
}
