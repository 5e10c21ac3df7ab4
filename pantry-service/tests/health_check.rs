//! End-to-end tests against a real MongoDB.
//!
//! Run with: cargo test -p pantry-service --test health_check -- --ignored

use pantry_service::config::PantryConfig;
use pantry_service::startup::Application;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

struct TestApp {
    address: String,
    uri: String,
    database: String,
}

impl TestApp {
    async fn drop_database(&self) {
        let client = mongodb::Client::with_uri_str(&self.uri).await.unwrap();
        client.database(&self.database).drop(None).await.unwrap();
    }
}

/// Spawn the application on a random port against a throwaway database.
async fn spawn_app() -> TestApp {
    let mut config = PantryConfig::for_tests();
    if let Ok(uri) = std::env::var("MONGODB_URI") {
        config.mongodb.uri = uri;
    }
    let uri = config.mongodb.uri.clone();
    let database = config.mongodb.database.clone();

    let app = Application::build(config)
        .await
        .expect("Failed to build application");
    let port = app.port();

    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    tokio::time::sleep(Duration::from_millis(100)).await;

    TestApp {
        address: format!("http://localhost:{}", port),
        uri,
        database,
    }
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn health_check_returns_ok() {
    let app = spawn_app().await;

    let response = Client::new()
        .get(format!("{}/health", app.address))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "pantry-service");

    app.drop_database().await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn unique_index_rejects_names_differing_only_in_case() {
    let app = spawn_app().await;
    let client = Client::new();
    let url = format!("{}/api/items/add", app.address);

    let first = client
        .post(&url)
        .json(&json!({ "item": "Garlic" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(first.status().as_u16(), 201);

    let second = client
        .post(&url)
        .json(&json!({ "item": "GARLIC" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(second.status().as_u16(), 409);

    let items: Value = client
        .get(format!("{}/api/items", app.address))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(items.as_array().map(Vec::len), Some(1));

    app.drop_database().await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn generated_recipes_are_persisted_newest_first() {
    let app = spawn_app().await;
    let client = Client::new();

    for items in [json!(["Egg", "Milk"]), json!(["Rice"])] {
        let response = client
            .post(format!("{}/api/recipes/basket/generate-recipe", app.address))
            .json(&json!({ "items": items }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status().as_u16(), 201);
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let history: Value = client
        .get(format!("{}/api/recipes/history", app.address))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");

    let history = history.as_array().expect("history is an array");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["ingredients"], json!(["Rice"]));
    assert_eq!(history[1]["ingredients"], json!(["Egg", "Milk"]));

    app.drop_database().await;
}
