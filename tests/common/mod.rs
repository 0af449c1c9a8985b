//! Shared helpers for router tests

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;

use library_catalog::{
    api, clock::FixedClock, config::AppConfig, repository::Repository, AppState,
};

pub struct TestApp {
    pub router: Router,
    pub clock: FixedClock,
}

impl TestApp {
    /// Router over a fresh in-memory store with a manual clock
    pub fn new() -> Self {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
        let state = AppState::new(
            &AppConfig::default(),
            Repository::in_memory(),
            Arc::new(clock.clone()),
        );

        Self {
            router: api::create_router(state),
            clock,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn create_person(&self, name: &str, year_of_birth: i32) -> i64 {
        let (status, body) = self
            .post(
                "/api/v1/people",
                serde_json::json!({ "name": name, "year_of_birth": year_of_birth }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().unwrap()
    }

    pub async fn create_book(&self, title: &str, author: &str, year: i32) -> i64 {
        let (status, body) = self
            .post(
                "/api/v1/books",
                serde_json::json!({ "title": title, "author": author, "year": year }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().unwrap()
    }

    pub async fn assign(&self, book_id: i64, person_id: i64) -> (StatusCode, Value) {
        self.request(
            Method::PATCH,
            &format!("/api/v1/books/{}/assign", book_id),
            Some(serde_json::json!({ "person_id": person_id })),
        )
        .await
    }
}
