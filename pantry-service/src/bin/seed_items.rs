//! Populate a running pantry service with a starter set of ingredients.

use reqwest::StatusCode;
use serde_json::json;
use service_core::observability::init_tracing;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:5001";

const SEED_ITEMS: [&str; 10] = [
    "Chicken", "Butter", "Tomato", "Onion", "Garlic", "Potato", "Rice", "Milk", "Egg", "Cheese",
];

const PAUSE: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing("seed-items", "info", None);

    let base_url = std::env::var("PANTRY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    let endpoint = format!("{}/api/items/add", base_url.trim_end_matches('/'));
    let client = reqwest::Client::new();

    tracing::info!(endpoint = %endpoint, "Seeding pantry items");

    let mut added = 0usize;
    for name in SEED_ITEMS {
        match client.post(&endpoint).json(&json!({ "item": name })).send().await {
            Ok(response) if response.status() == StatusCode::CREATED => {
                added += 1;
                tracing::info!(item = name, "Added");
            }
            Ok(response) if response.status() == StatusCode::CONFLICT => {
                tracing::info!(item = name, "Already exists");
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                tracing::error!(item = name, status = %status, body = %body, "Failed to add item");
            }
            Err(e) => {
                tracing::error!(item = name, "Request failed: {}", e.without_url());
            }
        }

        tokio::time::sleep(PAUSE).await;
    }

    tracing::info!(added, total = SEED_ITEMS.len(), "Seeding finished");
    Ok(())
}
