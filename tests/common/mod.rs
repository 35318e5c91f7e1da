//! Router harness backed by the in-memory store and a recording notifier.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use ride_booking_back_office::{
    router::build_router, services::notifier::RecordingNotifier, state::AppState,
    store::memory::MemoryStore,
};

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_notifier(RecordingNotifier::new())
    }

    pub fn with_notifier(notifier: RecordingNotifier) -> Self {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(notifier);
        let router = build_router(AppState::new(store.clone(), notifier.clone()));
        Self {
            router,
            store,
            notifier,
        }
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        api_key: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(key) = api_key {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {key}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    /// Register an agency and return `(agency_id, api_key)`.
    pub async fn register_agency(&self, name: &str, email: &str) -> (String, String) {
        let (status, body) = self
            .request(
                "POST",
                "/api/v1/agencies",
                None,
                Some(json!({
                    "agency_name": name,
                    "owner_name": "R. Kulkarni",
                    "operate_station": "Dadar",
                    "agency_email": email,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        (
            body["id"].as_str().unwrap().to_string(),
            body["api_key"].as_str().unwrap().to_string(),
        )
    }

    pub async fn create_vehicle(&self, key: &str, plate: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/api/v1/vehicles",
                Some(key),
                Some(json!({
                    "vehicle_name": "Dzire",
                    "number_plate": plate,
                    "ac_type": "AC",
                    "vehicle_type": "Sedan",
                    "max_capacity": 4
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn create_driver(&self, key: &str, name: &str, vehicle_id: Option<&str>) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/api/v1/drivers",
                Some(key),
                Some(json!({
                    "full_name": name,
                    "mobile": format!("98{}", &uuid::Uuid::new_v4().simple().to_string()[..8]),
                    "assigned_vehicle_id": vehicle_id
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn request_booking(&self, agency_id: &str, email: Option<&str>) -> String {
        let (status, body) = self
            .request(
                "POST",
                &format!("/api/v1/agencies/{agency_id}/bookings"),
                None,
                Some(json!({
                    "customer_name": "Asha Rao",
                    "customer_email": email,
                    "pickup_address": "Platform 2 exit",
                    "from": "Dadar",
                    "to": "Andheri",
                    "date": "2025-11-03",
                    "time": "09:30"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().to_string()
    }
}
