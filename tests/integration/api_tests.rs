//! API integration tests against a running server

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Name that will not collide with rows left by earlier runs
fn unique_name(prefix: &str) -> String {
    format!("{} {}", prefix, chrono::Utc::now().timestamp_micros())
}

async fn create_person(client: &Client, name: &str) -> Value {
    let response = client
        .post(format!("{}/people", BASE_URL))
        .json(&json!({ "name": name, "year_of_birth": 1985 }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse response")
}

async fn create_book(client: &Client, title: &str) -> Value {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({ "title": title, "author": "Leo Tolstoy", "year": 1869 }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse response")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
}

#[tokio::test]
#[ignore]
async fn test_list_books() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books?sort_by_year=true", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let years: Vec<i64> = body
        .as_array()
        .expect("Expected an array")
        .iter()
        .map(|b| b["year"].as_i64().unwrap())
        .collect();
    assert!(years.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
#[ignore]
async fn test_duplicate_person_name_rejected() {
    let client = Client::new();
    let name = unique_name("Anna Karenina");
    create_person(&client, &name).await;

    let response = client
        .post(format!("{}/people", BASE_URL))
        .json(&json!({ "name": name, "year_of_birth": 1990 }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 422);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["fields"]["name"][0], "these full names are already in use.");
}

#[tokio::test]
#[ignore]
async fn test_assign_and_release_book() {
    let client = Client::new();
    let person = create_person(&client, &unique_name("Pierre Bezukhov")).await;
    let book = create_book(&client, &unique_name("War and Peace")).await;
    let person_id = person["id"].as_i64().unwrap();
    let book_id = book["id"].as_i64().unwrap();

    let response = client
        .patch(format!("{}/books/{}/assign", BASE_URL, book_id))
        .json(&json!({ "person_id": person_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["outcome"], "applied");

    let held: Value = client
        .get(format!("{}/people/{}/books", BASE_URL, person_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let held = held.as_array().expect("Expected an array");
    assert_eq!(held.len(), 1);
    assert_eq!(held[0]["id"], book_id);
    assert_eq!(held[0]["overdue"], false);

    let response = client
        .patch(format!("{}/books/{}/release", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let details: Value = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert!(details["owner"].is_null());
    assert!(details["book"]["taken_at"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_get_missing_book() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books/{}", BASE_URL, i32::MAX))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}
