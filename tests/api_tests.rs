//! API integration tests
//!
//! These run against a live server with the seeded development database
//! (vehicle V-001 available, customer C-001 present).

use chrono::Utc;
use reqwest::Client;
use serde_json::{json, Value};

use virtus_rental_server::models::user::{Role, UserClaims};

const BASE_URL: &str = "http://localhost:8080/api/v1";
const DEV_SECRET: &str = "change-this-secret-in-production";

/// Mint a staff token the way the external identity provider would
fn staff_token() -> String {
    let now = Utc::now().timestamp();
    let claims = UserClaims {
        sub: "test-agent".to_string(),
        name: "Test Agent".to_string(),
        role: Role::Secretary,
        exp: now + 3600,
        iat: now,
    };
    claims.create_token(DEV_SECRET).expect("Failed to mint token")
}

fn client_token() -> String {
    let now = Utc::now().timestamp();
    let claims = UserClaims {
        sub: "test-client".to_string(),
        name: "Test Client".to_string(),
        role: Role::Client,
        exp: now + 3600,
        iat: now,
    };
    claims.create_token(DEV_SECRET).expect("Failed to mint token")
}

/// Token for a signer whose uid has never been seen by the server
fn fresh_signer_token(sub: &str) -> String {
    let now = Utc::now().timestamp();
    let claims = UserClaims {
        sub: sub.to_string(),
        name: "First Time Visitor".to_string(),
        role: Role::Client,
        exp: now + 3600,
        iat: now,
    };
    claims.create_token(DEV_SECRET).expect("Failed to mint token")
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
async fn test_list_vehicles() {
    let client = Client::new();

    let response = client
        .get(format!("{}/vehicles", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.is_array());
}

#[tokio::test]
#[ignore]
async fn test_availability_free_range_is_available() {
    let client = Client::new();

    let response = client
        .get(format!(
            "{}/vehicles/V-001/availability?pickup=2030-01-10&dropoff=2030-01-12",
            BASE_URL
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["available"], true);
    assert!(body["conflict_pickup_date"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_availability_unknown_vehicle_is_404() {
    let client = Client::new();

    let response = client
        .get(format!(
            "{}/vehicles/V-NOPE/availability?pickup=2030-01-10&dropoff=2030-01-12",
            BASE_URL
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_availability_inverted_range_is_400() {
    let client = Client::new();

    let response = client
        .get(format!(
            "{}/vehicles/V-001/availability?pickup=2030-01-12&dropoff=2030-01-10",
            BASE_URL
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_reservations_require_auth() {
    let client = Client::new();

    let response = client
        .get(format!("{}/reservations", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_reservations_reject_client_role() {
    let client = Client::new();

    let response = client
        .get(format!("{}/reservations", BASE_URL))
        .header("Authorization", format!("Bearer {}", client_token()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_create_and_cancel_reservation() {
    let client = Client::new();
    let token = staff_token();

    let response = client
        .post(format!("{}/reservations", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "customer_id": "C-001",
            "vehicle_id": "V-001",
            "pickup_date": "2031-03-01",
            "dropoff_date": "2031-03-04",
            "insurance_cost": "15.00"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let id = body["reservation"]["id"].as_str().expect("No reservation id");
    assert!(id.starts_with("RES-"));
    assert_eq!(body["reservation"]["status"], "Upcoming");
    assert_eq!(body["reservation"]["agent"], "Test Agent");

    // Overlapping booking on the same vehicle must be rejected
    let conflict = client
        .post(format!("{}/reservations", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "customer_id": "C-001",
            "vehicle_id": "V-001",
            "pickup_date": "2031-03-03",
            "dropoff_date": "2031-03-06",
            "insurance_cost": "15.00"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(conflict.status(), 409);

    // Back-to-back (pickup on the previous dropoff day) is allowed
    let back_to_back = client
        .post(format!("{}/reservations", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "customer_id": "C-001",
            "vehicle_id": "V-001",
            "pickup_date": "2031-03-04",
            "dropoff_date": "2031-03-05",
            "insurance_cost": "15.00"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(back_to_back.status(), 201);
    let second: Value = back_to_back.json().await.expect("Failed to parse response");
    let second_id = second["reservation"]["id"].as_str().unwrap().to_string();

    // Cleanup: cancel both
    for rid in [id.to_string(), second_id] {
        let cancel = client
            .post(format!("{}/reservations/{}/cancel", BASE_URL, rid))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .expect("Failed to send request");
        assert!(cancel.status().is_success());
        let cancelled: Value = cancel.json().await.expect("Failed to parse response");
        assert_eq!(cancelled["status"], "Cancelled");
    }
}

#[tokio::test]
#[ignore]
async fn test_cancel_twice_is_unprocessable() {
    let client = Client::new();
    let token = staff_token();

    let response = client
        .post(format!("{}/reservations", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "customer_id": "C-001",
            "vehicle_id": "V-001",
            "pickup_date": "2032-01-01",
            "dropoff_date": "2032-01-02",
            "insurance_cost": "15.00"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let id = body["reservation"]["id"].as_str().unwrap();

    let first = client
        .post(format!("{}/reservations/{}/cancel", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert!(first.status().is_success());

    let second = client
        .post(format!("{}/reservations/{}/cancel", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(second.status(), 422);
}

#[tokio::test]
#[ignore]
async fn test_departure_inspection_activates_reservation() {
    let client = Client::new();
    let token = staff_token();

    let response = client
        .post(format!("{}/reservations", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "customer_id": "C-001",
            "vehicle_id": "V-001",
            "pickup_date": "2033-05-01",
            "dropoff_date": "2033-05-03",
            "insurance_cost": "15.00"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let id = body["reservation"]["id"].as_str().unwrap().to_string();

    let form = inspection_form();
    let response = client
        .post(format!("{}/reservations/{}/inspections/departure", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "Active");
    assert_eq!(body["departure_inspection"]["fuel_level"], "3/4");
    assert_eq!(
        body["departure_inspection"]["photos"]
            .as_array()
            .unwrap()
            .len(),
        4
    );

    // A second departure inspection must be rejected
    let repeat = client
        .post(format!("{}/reservations/{}/inspections/departure", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .multipart(inspection_form())
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(repeat.status(), 409);

    // An Active reservation can no longer be cancelled
    let cancel = client
        .post(format!("{}/reservations/{}/cancel", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(cancel.status(), 422);

    // Return inspection completes the rental and frees the vehicle
    let ret = client
        .post(format!("{}/reservations/{}/inspections/return", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .multipart(inspection_form())
        .send()
        .await
        .expect("Failed to send request");
    assert!(ret.status().is_success());
    let body: Value = ret.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "Completed");

    let vehicle: Value = client
        .get(format!("{}/vehicles/V-001", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(vehicle["status"], "Available");
}

#[tokio::test]
#[ignore]
async fn test_inspection_requires_four_photos() {
    let client = Client::new();
    let token = staff_token();

    let response = client
        .post(format!("{}/reservations", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "customer_id": "C-001",
            "vehicle_id": "V-001",
            "pickup_date": "2034-02-01",
            "dropoff_date": "2034-02-02",
            "insurance_cost": "15.00"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let id = body["reservation"]["id"].as_str().unwrap().to_string();

    let form = reqwest::multipart::Form::new()
        .text("mileage", "42000")
        .text("fuel_level", "Full")
        .text("notes", "")
        .part("photo_front", png_part("front.jpg"))
        .part("signature", png_part("signature.png"));

    let response = client
        .post(format!("{}/reservations/{}/inspections/departure", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    // Cleanup
    client
        .post(format!("{}/reservations/{}/cancel", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
}

#[tokio::test]
#[ignore]
async fn test_contract_create_and_finalize() {
    let client = Client::new();
    let token = staff_token();

    // Pre-contract creation is public
    let response = client
        .post(format!("{}/contracts", BASE_URL))
        .json(&json!({
            "vehicle": { "id": "V-001", "make": "Toyota", "model": "Corolla" },
            "customer_data": {
                "name": "Jane Visitor",
                "email": "jane@example.com",
                "phone": "+1-555-0100"
            },
            "pickup_date": "2035-06-01",
            "dropoff_date": "2035-06-04",
            "insurance_cost": "15.00",
            "total_cost": "195.00",
            "language": "en"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);
    let contract_id = body["contract_id"].as_str().unwrap().to_string();

    let contract: Value = client
        .get(format!("{}/contracts/{}", BASE_URL, contract_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(contract["status"], "pending_signature");
    assert!(contract["reservation_id"].is_null());

    // Finalization needs the signer's token and both image parts
    let form = reqwest::multipart::Form::new()
        .part("idPhoto", png_part("id.jpg"))
        .part("signature", png_part("signature.png"));

    let response = client
        .post(format!("{}/contracts/{}/finalize", BASE_URL, contract_id))
        .header("Authorization", format!("Bearer {}", token))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);
    let reservation_id = body["reservation_id"].as_str().unwrap();
    assert!(reservation_id.starts_with("RES-"));

    // Vehicle is held once the contract is finalized
    let vehicle: Value = client
        .get(format!("{}/vehicles/V-001", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(vehicle["status"], "Rented");

    // A second finalize of the same contract must fail
    let form = reqwest::multipart::Form::new()
        .part("idPhoto", png_part("id.jpg"))
        .part("signature", png_part("signature.png"));
    let repeat = client
        .post(format!("{}/contracts/{}/finalize", BASE_URL, contract_id))
        .header("Authorization", format!("Bearer {}", token))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(repeat.status(), 422);

    // Cleanup: cancel the reservation created by finalize
    client
        .post(format!("{}/reservations/{}/cancel", BASE_URL, reservation_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
}

#[tokio::test]
#[ignore]
async fn test_finalize_without_signature_is_400() {
    let client = Client::new();
    let token = staff_token();

    let response = client
        .post(format!("{}/contracts", BASE_URL))
        .json(&json!({
            "vehicle": { "id": "V-001", "make": "Toyota", "model": "Corolla" },
            "customer_data": { "name": "Jane Visitor" },
            "pickup_date": "2036-01-01",
            "dropoff_date": "2036-01-02",
            "total_cost": "65.00"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let contract_id = body["contract_id"].as_str().unwrap();

    let form = reqwest::multipart::Form::new().part("idPhoto", png_part("id.jpg"));
    let response = client
        .post(format!("{}/contracts/{}/finalize", BASE_URL, contract_id))
        .header("Authorization", format!("Bearer {}", token))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_finalize_by_unknown_signer_creates_their_customer_record() {
    let client = Client::new();
    let signer_uid = format!("visitor-{}", uuid::Uuid::new_v4());
    let token = fresh_signer_token(&signer_uid);

    let response = client
        .post(format!("{}/contracts", BASE_URL))
        .json(&json!({
            "vehicle": { "id": "V-001", "make": "Toyota", "model": "Corolla" },
            "customer_data": { "name": "First Time Visitor" },
            "pickup_date": "2037-04-01",
            "dropoff_date": "2037-04-03",
            "total_cost": "130.00"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let contract_id = body["contract_id"].as_str().unwrap().to_string();

    // The signer's uid exists nowhere in the customers table yet; the
    // finalize transaction must still produce a reservation bound to it
    let form = reqwest::multipart::Form::new()
        .part("idPhoto", png_part("id.jpg"))
        .part("signature", png_part("signature.png"));
    let response = client
        .post(format!("{}/contracts/{}/finalize", BASE_URL, contract_id))
        .header("Authorization", format!("Bearer {}", token))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    let reservation_id = body["reservation_id"].as_str().unwrap().to_string();

    let staff = staff_token();
    let reservation: Value = client
        .get(format!("{}/reservations/{}", BASE_URL, reservation_id))
        .header("Authorization", format!("Bearer {}", staff))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(reservation["customer_id"], signer_uid.as_str());
    assert_eq!(reservation["customer_name"], "First Time Visitor");

    // Cleanup
    client
        .post(format!("{}/reservations/{}/cancel", BASE_URL, reservation_id))
        .header("Authorization", format!("Bearer {}", staff))
        .send()
        .await
        .expect("Failed to send request");
}

#[tokio::test]
#[ignore]
async fn test_racing_overlapping_creates_admit_exactly_one() {
    let client = Client::new();
    let token = staff_token();

    let booking = |pickup: &str, dropoff: &str| {
        let client = client.clone();
        let token = token.clone();
        let body = json!({
            "customer_id": "C-001",
            "vehicle_id": "V-001",
            "pickup_date": pickup,
            "dropoff_date": dropoff,
            "insurance_cost": "15.00"
        });
        async move {
            client
                .post(format!("{}/reservations", BASE_URL))
                .header("Authorization", format!("Bearer {}", token))
                .json(&body)
                .send()
                .await
                .expect("Failed to send request")
        }
    };

    let (first, second) = tokio::join!(
        booking("2038-01-10", "2038-01-14"),
        booking("2038-01-12", "2038-01-16")
    );

    let mut statuses = [first.status().as_u16(), second.status().as_u16()];
    statuses.sort();
    assert_eq!(statuses, [201, 409]);

    // Disjoint ranges racing on the same vehicle both land, with distinct ids
    let (third, fourth) = tokio::join!(
        booking("2038-02-01", "2038-02-03"),
        booking("2038-02-03", "2038-02-05")
    );
    assert_eq!(third.status(), 201);
    assert_eq!(fourth.status(), 201);

    let mut ids = Vec::new();
    for response in [first, second, third, fourth] {
        if response.status() == 201 {
            let body: Value = response.json().await.expect("Failed to parse response");
            ids.push(body["reservation"]["id"].as_str().unwrap().to_string());
        }
    }
    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ids.len());

    // Cleanup
    for id in ids {
        client
            .post(format!("{}/reservations/{}/cancel", BASE_URL, id))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .expect("Failed to send request");
    }
}

#[tokio::test]
#[ignore]
async fn test_finalize_rejected_once_vehicle_is_taken() {
    let client = Client::new();
    let token = staff_token();

    let response = client
        .post(format!("{}/contracts", BASE_URL))
        .json(&json!({
            "vehicle": { "id": "V-001", "make": "Toyota", "model": "Corolla" },
            "customer_data": { "name": "Jane Visitor" },
            "pickup_date": "2039-07-01",
            "dropoff_date": "2039-07-03",
            "total_cost": "130.00"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let contract_id = body["contract_id"].as_str().unwrap().to_string();

    // A staff booking takes the vehicle between signature and finalize
    let response = client
        .post(format!("{}/reservations", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "customer_id": "C-001",
            "vehicle_id": "V-001",
            "pickup_date": "2039-08-01",
            "dropoff_date": "2039-08-02",
            "insurance_cost": "15.00"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let blocking_id = body["reservation"]["id"].as_str().unwrap().to_string();

    let form = reqwest::multipart::Form::new()
        .part("idPhoto", png_part("id.jpg"))
        .part("signature", png_part("signature.png"));
    let response = client
        .post(format!("{}/contracts/{}/finalize", BASE_URL, contract_id))
        .header("Authorization", format!("Bearer {}", token))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], 8); // VehicleNotAvailable

    // Cleanup
    client
        .post(format!("{}/reservations/{}/cancel", BASE_URL, blocking_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
}

fn png_part(filename: &str) -> reqwest::multipart::Part {
    reqwest::multipart::Part::bytes(vec![0u8; 64])
        .file_name(filename.to_string())
        .mime_str("image/png")
        .expect("Invalid mime")
}

fn inspection_form() -> reqwest::multipart::Form {
    reqwest::multipart::Form::new()
        .text("mileage", "42000")
        .text("fuel_level", "3/4")
        .text("notes", "Small scratch on rear bumper")
        .part("photo_front", png_part("front.jpg"))
        .part("photo_right", png_part("right.jpg"))
        .part("photo_back", png_part("back.jpg"))
        .part("photo_left", png_part("left.jpg"))
        .part("signature", png_part("signature.png"))
}
