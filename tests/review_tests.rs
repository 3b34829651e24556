use actix_web::{App, test, web};
use serde_json::json;

use farm_match_be::handlers::reviews;

mod common;

use common::{TestContext, date};

macro_rules! review_app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($ctx.reviews.clone()))
                .app_data(web::Data::new($ctx.stamp_service.clone()))
                .service(
                    web::scope("/api")
                        .service(
                            web::scope("/reviews")
                                .route("", web::post().to(reviews::create_review))
                                .route("/{id}", web::get().to(reviews::get_review)),
                        )
                        .service(web::scope("/farms").route(
                            "/{id}/reviews/average",
                            web::get().to(reviews::get_farm_average_rating),
                        )),
                ),
        )
        .await
    };
}

#[actix_web::test]
async fn review_flow_awards_stamp_and_rejects_duplicates() {
    let ctx = TestContext::new().await.unwrap();
    let app = review_app!(ctx);

    let host = ctx.create_host().await.unwrap();
    let guest = ctx.create_guest().await.unwrap();
    let farm = ctx.create_farm(host.id, "京都府", 4000, 5).await.unwrap();
    let reservation = ctx
        .create_reservation(
            guest.id,
            farm.id,
            date(2025, 7, 10),
            date(2025, 7, 12),
            2,
            16000,
        )
        .await
        .unwrap();

    let payload = json!({
        "reservation_id": reservation.id,
        "guest_id": guest.id,
        "farm_id": farm.id,
        "rating": 5,
        "comment": "Wonderful stay",
        "experience_date": "2025-07-12"
    });

    let req = test::TestRequest::post()
        .uri("/api/reviews")
        .set_json(payload.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["rating"], 5);

    // Posting the review stamped Kyoto (code 26) for the guest.
    let collection = ctx
        .stamp_service
        .get_user_collection(guest.id)
        .await
        .unwrap();
    let kyoto = collection
        .stamps
        .iter()
        .find(|s| s.prefecture_code == "26")
        .unwrap();
    assert!(kyoto.is_visited);

    // One review per reservation.
    let req = test::TestRequest::post()
        .uri("/api/reviews")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::get()
        .uri(&format!("/api/farms/{}/reviews/average", farm.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["average_rating"], 5.0);
}

#[actix_web::test]
async fn review_rating_is_bounded() {
    let ctx = TestContext::new().await.unwrap();
    let app = review_app!(ctx);

    let host = ctx.create_host().await.unwrap();
    let guest = ctx.create_guest().await.unwrap();
    let farm = ctx.create_farm(host.id, "京都府", 4000, 5).await.unwrap();
    let reservation = ctx
        .create_reservation(
            guest.id,
            farm.id,
            date(2025, 7, 10),
            date(2025, 7, 12),
            2,
            16000,
        )
        .await
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/api/reviews")
        .set_json(json!({
            "reservation_id": reservation.id,
            "guest_id": guest.id,
            "farm_id": farm.id,
            "rating": 6,
            "comment": null,
            "experience_date": "2025-07-12"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}
