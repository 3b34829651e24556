use actix_web::{App, test, web};
use serde_json::json;

use farm_match_be::handlers::reservations;
use farm_match_be::services::booking::BookingError;

mod common;

use common::TestContext;

macro_rules! reservation_app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($ctx.config.clone()))
                .app_data(web::Data::new($ctx.farms.clone()))
                .app_data(web::Data::new($ctx.reservations.clone()))
                .service(
                    web::scope("/api/reservations")
                        .route("", web::get().to(reservations::get_reservations))
                        .route("", web::post().to(reservations::create_reservation))
                        .route("/{id}", web::get().to(reservations::get_reservation))
                        .route(
                            "/{id}/approve",
                            web::post().to(reservations::approve_reservation),
                        )
                        .route(
                            "/{id}/cancel",
                            web::post().to(reservations::cancel_reservation),
                        ),
                ),
        )
        .await
    };
}

#[actix_web::test]
async fn booking_end_to_end() {
    let ctx = TestContext::new().await.unwrap();
    let app = reservation_app!(ctx);

    let guest = ctx.create_guest().await.unwrap();
    let host = ctx.create_host().await.unwrap();
    let farm = ctx.create_farm(host.id, "北海道", 4000, 5).await.unwrap();
    let token = ctx.token_for(&guest);

    // 2 nights x 3 guests x 4000 = 24000
    let req = test::TestRequest::post()
        .uri("/api/reservations")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({
            "farm_id": farm.id,
            "guest_id": guest.id,
            "start_date": "2025-07-10",
            "end_date": "2025-07-12",
            "num_guests": 3,
            "total_amount": 24000,
            "contact_phone": "090-1234-5678",
            "message": null
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["total_amount"], 24000);
    assert_eq!(body["data"]["num_guests"], 3);
    assert_eq!(body["data"]["guest_id"], guest.id);

    // The reservation is persisted and visible in the guest's listing.
    let req = test::TestRequest::get()
        .uri(&format!("/api/reservations?guest_id={}", guest.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn booking_requires_token() {
    let ctx = TestContext::new().await.unwrap();
    let app = reservation_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/reservations")
        .set_json(json!({
            "farm_id": 1,
            "guest_id": 1,
            "start_date": "2025-07-10",
            "end_date": "2025-07-12",
            "num_guests": 3,
            "total_amount": 24000,
            "contact_phone": "090-1234-5678",
            "message": null
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn booking_rejects_invalid_forms() {
    let ctx = TestContext::new().await.unwrap();
    let app = reservation_app!(ctx);

    let guest = ctx.create_guest().await.unwrap();
    let host = ctx.create_host().await.unwrap();
    let farm = ctx.create_farm(host.id, "北海道", 4000, 5).await.unwrap();
    let token = ctx.token_for(&guest);

    let base = json!({
        "farm_id": farm.id,
        "guest_id": guest.id,
        "start_date": "2025-07-10",
        "end_date": "2025-07-12",
        "num_guests": 3,
        "total_amount": 24000,
        "contact_phone": "090-1234-5678",
        "message": null
    });

    // Check-out before check-in.
    let mut payload = base.clone();
    payload["start_date"] = json!("2025-07-12");
    payload["end_date"] = json!("2025-07-10");
    let req = test::TestRequest::post()
        .uri("/api/reservations")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(
        body["message"],
        BookingError::CheckOutNotAfterCheckIn.to_string()
    );

    // Zero guests fails regardless of valid dates.
    let mut payload = base.clone();
    payload["num_guests"] = json!(0);
    payload["total_amount"] = json!(0);
    let req = test::TestRequest::post()
        .uri("/api/reservations")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    // Over farm capacity.
    let mut payload = base.clone();
    payload["num_guests"] = json!(6);
    payload["total_amount"] = json!(48000);
    let req = test::TestRequest::post()
        .uri("/api/reservations")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    // Phone with anything but digits and hyphens.
    let mut payload = base.clone();
    payload["contact_phone"] = json!("090 1234 5678");
    let req = test::TestRequest::post()
        .uri("/api/reservations")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    // A client-computed total that disagrees with the server's derivation.
    let mut payload = base.clone();
    payload["total_amount"] = json!(8000);
    let req = test::TestRequest::post()
        .uri("/api/reservations")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    // Nothing was written by any of the rejected attempts.
    let reservations = ctx
        .reservations
        .get_reservations(Some(guest.id), None, None, 0, 100)
        .await
        .unwrap();
    assert!(reservations.is_empty());
}

#[actix_web::test]
async fn booking_unknown_farm_is_not_found() {
    let ctx = TestContext::new().await.unwrap();
    let app = reservation_app!(ctx);

    let guest = ctx.create_guest().await.unwrap();
    let token = ctx.token_for(&guest);

    let req = test::TestRequest::post()
        .uri("/api/reservations")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({
            "farm_id": 9999,
            "guest_id": guest.id,
            "start_date": "2025-07-10",
            "end_date": "2025-07-12",
            "num_guests": 2,
            "total_amount": 16000,
            "contact_phone": "090-1234-5678",
            "message": null
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn approval_state_machine() {
    let ctx = TestContext::new().await.unwrap();
    let app = reservation_app!(ctx);

    let guest = ctx.create_guest().await.unwrap();
    let host = ctx.create_host().await.unwrap();
    let other_host = ctx.create_host().await.unwrap();
    let farm = ctx.create_farm(host.id, "北海道", 4000, 5).await.unwrap();
    let reservation = ctx
        .create_reservation(
            guest.id,
            farm.id,
            common::date(2025, 7, 10),
            common::date(2025, 7, 12),
            2,
            16000,
        )
        .await
        .unwrap();

    // A host who does not own the farm cannot approve.
    let req = test::TestRequest::post()
        .uri(&format!("/api/reservations/{}/approve", reservation.id))
        .insert_header((
            "Authorization",
            format!("Bearer {}", ctx.token_for(&other_host)),
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    // The owning host approves the pending reservation.
    let req = test::TestRequest::post()
        .uri(&format!("/api/reservations/{}/approve", reservation.id))
        .insert_header(("Authorization", format!("Bearer {}", ctx.token_for(&host))))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "approved");

    // Approving twice is rejected.
    let req = test::TestRequest::post()
        .uri(&format!("/api/reservations/{}/approve", reservation.id))
        .insert_header(("Authorization", format!("Bearer {}", ctx.token_for(&host))))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    // An approved reservation can still be cancelled.
    let req = test::TestRequest::post()
        .uri(&format!("/api/reservations/{}/cancel", reservation.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "cancelled");

    // But not cancelled twice.
    let req = test::TestRequest::post()
        .uri(&format!("/api/reservations/{}/cancel", reservation.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn guests_always_book_as_themselves() {
    let ctx = TestContext::new().await.unwrap();
    let app = reservation_app!(ctx);

    let guest = ctx.create_guest().await.unwrap();
    let other = ctx.create_guest().await.unwrap();
    let host = ctx.create_host().await.unwrap();
    let farm = ctx.create_farm(host.id, "北海道", 4000, 5).await.unwrap();
    let token = ctx.token_for(&guest);

    // The payload claims another guest's id; the token wins.
    let req = test::TestRequest::post()
        .uri("/api/reservations")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({
            "farm_id": farm.id,
            "guest_id": other.id,
            "start_date": "2025-07-10",
            "end_date": "2025-07-12",
            "num_guests": 2,
            "total_amount": 16000,
            "contact_phone": "090-1234-5678",
            "message": "Looking forward to it"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["guest_id"], guest.id);
}
