//! End-to-end flows through the HTTP router.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;
use ride_booking_back_office::services::notifier::RecordingNotifier;

#[tokio::test]
async fn health_reports_store_connectivity() {
    let app = TestApp::new();

    let (status, body) = app.request("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    app.store.set_unavailable(true);
    let (status, body) = app.request("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "internal_error");
}

#[tokio::test]
async fn agency_routes_need_a_valid_key() {
    let app = TestApp::new();

    let (status, body) = app
        .request("GET", "/api/v1/bookings/pending", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "unauthorized");

    let (status, _) = app
        .request("GET", "/api/v1/bookings/pending", Some("not-a-key"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn registration_shows_the_key_once_and_rejects_duplicates() {
    let app = TestApp::new();
    let (_, key) = app
        .register_agency("Western Line Cabs", "ops@westline.example")
        .await;
    assert_eq!(key.len(), 64);

    let (status, body) = app
        .request(
            "POST",
            "/api/v1/agencies",
            None,
            Some(json!({
                "agency_name": "Copycat Cabs",
                "agency_email": "OPS@westline.example"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "conflict");

    let (status, _) = app
        .request("GET", "/api/v1/drivers", Some(&key), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn approval_flow_sends_a_confirmation() {
    let app = TestApp::new();
    let (agency_id, key) = app
        .register_agency("Western Line Cabs", "ops@westline.example")
        .await;
    let vehicle_id = app.create_vehicle(&key, "MH02AB1234").await;
    let driver_id = app
        .create_driver(&key, "Imran Shaikh", Some(&vehicle_id))
        .await;
    let booking_id = app
        .request_booking(&agency_id, Some("asha@example.com"))
        .await;

    let (status, pending) = app
        .request("GET", "/api/v1/bookings/pending", Some(&key), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pending.as_array().unwrap().len(), 1);

    let (status, body) = app
        .request(
            "POST",
            &format!("/api/v1/bookings/{booking_id}/approve"),
            Some(&key),
            Some(json!({ "driver_id": driver_id, "fare_cents": 45000 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["booking"]["status"], "approved");
    assert_eq!(body["booking"]["fare_cents"], 45000);
    assert_eq!(body["booking"]["driver_name"], "Imran Shaikh");
    assert_eq!(body["booking"]["assigned_vehicle_id"], vehicle_id.as_str());
    assert_eq!(body["notification"]["status"], "sent");
    assert_eq!(body["notification"]["recipient"], "asha@example.com");

    let sent = app.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].content.contains("MH02AB1234"));
    assert!(sent[0].content.contains("₹ 450.00"));
    assert!(sent[0].content.contains("Western Line Cabs"));

    let (status, body) = app
        .request(
            "POST",
            &format!("/api/v1/bookings/{booking_id}/approve"),
            Some(&key),
            Some(json!({ "driver_id": driver_id, "fare_cents": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "invalid_transition");

    let (_, approved) = app
        .request("GET", "/api/v1/bookings/approved", Some(&key), None)
        .await;
    assert_eq!(approved.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn failed_delivery_still_approves() {
    let app = TestApp::with_notifier(RecordingNotifier::failing());
    let (agency_id, key) = app
        .register_agency("Western Line Cabs", "ops@westline.example")
        .await;
    let vehicle_id = app.create_vehicle(&key, "MH02AB1234").await;
    let driver_id = app.create_driver(&key, "Imran", Some(&vehicle_id)).await;
    let booking_id = app
        .request_booking(&agency_id, Some("asha@example.com"))
        .await;

    let (status, body) = app
        .request(
            "POST",
            &format!("/api/v1/bookings/{booking_id}/approve"),
            Some(&key),
            Some(json!({ "driver_id": driver_id, "fare_cents": 30000 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking"]["status"], "approved");
    assert_eq!(body["notification"]["status"], "failed");
}

#[tokio::test]
async fn driver_without_vehicle_skips_the_confirmation() {
    let app = TestApp::new();
    let (agency_id, key) = app
        .register_agency("Western Line Cabs", "ops@westline.example")
        .await;
    let driver_id = app.create_driver(&key, "Imran", None).await;
    let booking_id = app
        .request_booking(&agency_id, Some("asha@example.com"))
        .await;

    let (status, body) = app
        .request(
            "POST",
            &format!("/api/v1/bookings/{booking_id}/approve"),
            Some(&key),
            Some(json!({ "driver_id": driver_id, "fare_cents": 30000 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking"]["status"], "approved");
    assert_eq!(body["booking"]["driver_name"], "Imran");
    assert_eq!(body["notification"]["status"], "skipped");
    assert!(app.notifier.sent().is_empty());
}

#[tokio::test]
async fn other_agencies_cannot_touch_a_booking() {
    let app = TestApp::new();
    let (agency_id, _) = app
        .register_agency("Western Line Cabs", "ops@westline.example")
        .await;
    let (_, other_key) = app
        .register_agency("Harbour Cabs", "ops@harbour.example")
        .await;
    let booking_id = app.request_booking(&agency_id, None).await;

    let (status, body) = app
        .request(
            "POST",
            &format!("/api/v1/bookings/{booking_id}/reject"),
            Some(&other_key),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "booking_not_found");
}

#[tokio::test]
async fn rejected_booking_leaves_the_pending_list() {
    let app = TestApp::new();
    let (agency_id, key) = app
        .register_agency("Western Line Cabs", "ops@westline.example")
        .await;
    let booking_id = app.request_booking(&agency_id, None).await;

    let (status, body) = app
        .request(
            "POST",
            &format!("/api/v1/bookings/{booking_id}/reject"),
            Some(&key),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "rejected");
    assert_eq!(body["fare_cents"], serde_json::Value::Null);

    let (_, pending) = app
        .request("GET", "/api/v1/bookings/pending", Some(&key), None)
        .await;
    assert!(pending.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn completed_rides_show_up_in_earnings() {
    let app = TestApp::new();
    let (agency_id, key) = app
        .register_agency("Western Line Cabs", "ops@westline.example")
        .await;
    let vehicle_id = app.create_vehicle(&key, "MH02AB1234").await;
    let driver_id = app.create_driver(&key, "D1", Some(&vehicle_id)).await;

    for fare in [30000, 70000] {
        let booking_id = app.request_booking(&agency_id, None).await;
        let base = format!("/api/v1/bookings/{booking_id}");
        let (status, _) = app
            .request(
                "POST",
                &format!("{base}/approve"),
                Some(&key),
                Some(json!({ "driver_id": driver_id, "fare_cents": fare })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        for next in ["ongoing", "completed"] {
            let (status, body) = app
                .request(
                    "POST",
                    &format!("{base}/status"),
                    Some(&key),
                    Some(json!({ "status": next })),
                )
                .await;
            assert_eq!(status, StatusCode::OK, "{body}");
        }
    }

    let (status, report) = app
        .request(
            "GET",
            "/api/v1/earnings?start_date=2025-11-03&end_date=2025-11-03",
            Some(&key),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["total_earnings_cents"], 100000);
    assert_eq!(
        report["driver_breakdown"],
        json!([{
            "driver_id": driver_id,
            "name": "D1",
            "total_cents": 100000,
            "contribution": "100.00"
        }])
    );
}

#[tokio::test]
async fn earnings_range_is_validated() {
    let app = TestApp::new();
    let (_, key) = app
        .register_agency("Western Line Cabs", "ops@westline.example")
        .await;

    for uri in [
        "/api/v1/earnings?start_date=2025-11-30&end_date=2025-11-01",
        "/api/v1/earnings?start_date=2025-11-01",
        "/api/v1/earnings?start_date=yesterday&end_date=2025-11-01",
    ] {
        let (status, body) = app.request("GET", uri, Some(&key), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"]["code"], "invalid_request");
    }

    let (status, report) = app
        .request("GET", "/api/v1/earnings", Some(&key), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["total_earnings_cents"], 0);
}

#[tokio::test]
async fn vehicle_list_derives_the_driver() {
    let app = TestApp::new();
    let (_, key) = app
        .register_agency("Western Line Cabs", "ops@westline.example")
        .await;
    let vehicle_id = app.create_vehicle(&key, "MH02AB1234").await;
    let driver_id = app.create_driver(&key, "Imran", Some(&vehicle_id)).await;

    let (_, vehicles) = app
        .request("GET", "/api/v1/vehicles", Some(&key), None)
        .await;
    assert_eq!(vehicles[0]["assigned_driver_id"], driver_id.as_str());
    assert_eq!(vehicles[0]["available"], false);

    let (status, driver) = app
        .request(
            "PUT",
            &format!("/api/v1/drivers/{driver_id}/vehicle"),
            Some(&key),
            Some(json!({ "vehicle_id": null })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(driver["assigned_vehicle"], serde_json::Value::Null);

    let (_, vehicles) = app
        .request("GET", "/api/v1/vehicles", Some(&key), None)
        .await;
    assert_eq!(vehicles[0]["available"], true);

    let (status, _) = app
        .request(
            "DELETE",
            &format!("/api/v1/vehicles/{vehicle_id}"),
            Some(&key),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn fare_above_the_ceiling_is_a_bad_request() {
    let app = TestApp::new();
    let (agency_id, key) = app
        .register_agency("Western Line Cabs", "ops@westline.example")
        .await;
    let driver_id = app.create_driver(&key, "Imran Shaikh", None).await;
    let booking_id = app
        .request_booking(&agency_id, Some("asha@example.com"))
        .await;

    let (status, body) = app
        .request(
            "POST",
            &format!("/api/v1/bookings/{booking_id}/approve"),
            Some(&key),
            Some(json!({ "driver_id": driver_id, "fare_cents": i64::MAX })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_request");

    let (_, pending) = app
        .request("GET", "/api/v1/bookings/pending", Some(&key), None)
        .await;
    assert_eq!(pending.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn malformed_customer_email_is_a_bad_request() {
    let app = TestApp::new();
    let (agency_id, _) = app
        .register_agency("Western Line Cabs", "ops@westline.example")
        .await;

    let (status, body) = app
        .request(
            "POST",
            &format!("/api/v1/agencies/{agency_id}/bookings"),
            None,
            Some(json!({
                "customer_email": "asha@example@com",
                "from": "Dadar",
                "to": "Andheri",
                "date": "2025-11-03"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_request");
}

#[tokio::test]
async fn profiles_can_be_edited_in_place() {
    let app = TestApp::new();
    let (agency_id, key) = app
        .register_agency("Western Line Cabs", "ops@westline.example")
        .await;
    let vehicle_id = app.create_vehicle(&key, "MH02AB1234").await;
    let driver_id = app.create_driver(&key, "Imran", Some(&vehicle_id)).await;

    let (status, agency) = app
        .request(
            "PATCH",
            "/api/v1/agencies/me",
            Some(&key),
            Some(json!({ "operate_station": "Bandra", "agency_email": "new@westline.example" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{agency}");
    assert_eq!(agency["id"], agency_id.as_str());
    assert_eq!(agency["operate_station"], "Bandra");
    assert_eq!(agency["agency_email"], "ops@westline.example");
    assert!(agency.get("api_key").is_none());

    let (status, agency) = app
        .request("GET", "/api/v1/agencies/me", Some(&key), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(agency["operate_station"], "Bandra");

    let (status, driver) = app
        .request(
            "PATCH",
            &format!("/api/v1/drivers/{driver_id}"),
            Some(&key),
            Some(json!({ "full_name": "Imran Shaikh", "age": 38 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{driver}");
    assert_eq!(driver["full_name"], "Imran Shaikh");
    assert_eq!(driver["assigned_vehicle"]["id"], vehicle_id.as_str());

    let (status, vehicle) = app
        .request(
            "PATCH",
            &format!("/api/v1/vehicles/{vehicle_id}"),
            Some(&key),
            Some(json!({ "number_plate": "mh02ab9999" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{vehicle}");
    assert_eq!(vehicle["number_plate"], "MH02AB9999");
    assert_eq!(vehicle["assigned_driver_name"], "Imran Shaikh");
}

#[tokio::test]
async fn edits_respect_ownership_and_uniqueness() {
    let app = TestApp::new();
    let (_, key) = app
        .register_agency("Western Line Cabs", "ops@westline.example")
        .await;
    let (_, other_key) = app
        .register_agency("Harbour Cabs", "ops@harbour.example")
        .await;
    let vehicle_id = app.create_vehicle(&key, "MH02AB0001").await;
    app.create_vehicle(&key, "MH02AB0002").await;
    let driver_id = app.create_driver(&key, "Imran", None).await;

    let (status, body) = app
        .request(
            "PATCH",
            &format!("/api/v1/vehicles/{vehicle_id}"),
            Some(&key),
            Some(json!({ "number_plate": "MH02AB0002" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "conflict");

    let (status, _) = app
        .request(
            "PATCH",
            &format!("/api/v1/drivers/{driver_id}"),
            Some(&other_key),
            Some(json!({ "full_name": "Hijacked" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request(
            "PATCH",
            &format!("/api/v1/vehicles/{vehicle_id}"),
            Some(&other_key),
            Some(json!({ "vehicle_name": "Hijacked" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request(
            "PATCH",
            "/api/v1/agencies/me",
            None,
            Some(json!({ "agency_name": "Anonymous" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
