use farm_match_be::database::models::ReviewInput;

mod common;

use common::{TestContext, date};

async fn review_stay(
    ctx: &TestContext,
    guest_id: i64,
    farm_id: i64,
    start: chrono::NaiveDate,
    end: chrono::NaiveDate,
) -> i64 {
    let reservation = ctx
        .create_reservation(guest_id, farm_id, start, end, 2, 16000)
        .await
        .unwrap();

    let review = ctx
        .reviews
        .create_review(ReviewInput {
            reservation_id: reservation.id,
            guest_id,
            farm_id,
            rating: 5,
            comment: None,
            experience_date: end,
        })
        .await
        .unwrap();

    ctx.stamp_service.sync_from_review(review.id).await.unwrap();
    review.id
}

#[actix_web::test]
async fn prefecture_master_has_all_47() {
    let ctx = TestContext::new().await.unwrap();

    let prefectures = ctx.stamp_service.get_all_prefectures().await.unwrap();
    assert_eq!(prefectures.len(), 47);
    assert_eq!(prefectures[0].prefecture_code, "01");
    assert_eq!(prefectures[0].name, "北海道");
    assert_eq!(prefectures[46].prefecture_code, "47");
}

#[actix_web::test]
async fn collection_covers_every_prefecture_even_with_no_visits() {
    let ctx = TestContext::new().await.unwrap();
    let guest = ctx.create_guest().await.unwrap();

    let collection = ctx
        .stamp_service
        .get_user_collection(guest.id)
        .await
        .unwrap();

    assert_eq!(collection.stamps.len(), 47);
    assert!(collection.stamps.iter().all(|s| !s.is_visited));
    assert_eq!(collection.summary.total_prefectures, 0);
    assert_eq!(collection.summary.completion_rate, 0.0);
}

#[actix_web::test]
async fn review_awards_a_stamp() {
    let ctx = TestContext::new().await.unwrap();
    let host = ctx.create_host().await.unwrap();
    let guest = ctx.create_guest().await.unwrap();
    let farm = ctx.create_farm(host.id, "北海道", 4000, 5).await.unwrap();

    review_stay(&ctx, guest.id, farm.id, date(2025, 7, 10), date(2025, 7, 12)).await;

    let collection = ctx
        .stamp_service
        .get_user_collection(guest.id)
        .await
        .unwrap();

    assert_eq!(collection.summary.total_prefectures, 1);
    assert_eq!(collection.summary.total_visits, 1);
    assert_eq!(collection.summary.total_farms, 1);
    assert_eq!(collection.summary.completion_rate, 2.1); // 1/47

    let hokkaido = collection
        .stamps
        .iter()
        .find(|s| s.prefecture_code == "01")
        .unwrap();
    assert!(hokkaido.is_visited);
    assert_eq!(hokkaido.visit_count, 1);
    assert_eq!(hokkaido.first_visit_date, Some(date(2025, 7, 12)));
}

#[actix_web::test]
async fn repeat_visits_widen_the_collection_row() {
    let ctx = TestContext::new().await.unwrap();
    let host = ctx.create_host().await.unwrap();
    let guest = ctx.create_guest().await.unwrap();
    let farm_a = ctx.create_farm(host.id, "北海道", 4000, 5).await.unwrap();
    let farm_b = ctx.create_farm(host.id, "北海道", 5000, 4).await.unwrap();

    review_stay(&ctx, guest.id, farm_a.id, date(2025, 5, 1), date(2025, 5, 3)).await;
    review_stay(&ctx, guest.id, farm_b.id, date(2025, 7, 10), date(2025, 7, 12)).await;

    let detail = ctx
        .stamp_service
        .get_prefecture_detail(guest.id, "01")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(detail.visit_count, 2);
    assert_eq!(detail.unique_farms_count, 2);
    assert_eq!(detail.first_visit_date, date(2025, 5, 3));
    assert_eq!(detail.last_visit_date, date(2025, 7, 12));
    assert_eq!(detail.visited_farms.len(), 2);
    // Newest visit first.
    assert_eq!(detail.visited_farms[0].farm_id, farm_b.id);
}

#[actix_web::test]
async fn sync_is_idempotent_per_review() {
    let ctx = TestContext::new().await.unwrap();
    let host = ctx.create_host().await.unwrap();
    let guest = ctx.create_guest().await.unwrap();
    let farm = ctx.create_farm(host.id, "沖縄県", 4000, 5).await.unwrap();

    let review_id =
        review_stay(&ctx, guest.id, farm.id, date(2025, 7, 10), date(2025, 7, 12)).await;

    // Replaying the sync must not add a second detail row.
    ctx.stamp_service.sync_from_review(review_id).await.unwrap();

    let detail = ctx
        .stamp_service
        .get_prefecture_detail(guest.id, "47")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.visited_farms.len(), 1);
}

#[actix_web::test]
async fn unvisited_prefecture_detail_is_none() {
    let ctx = TestContext::new().await.unwrap();
    let guest = ctx.create_guest().await.unwrap();

    let detail = ctx
        .stamp_service
        .get_prefecture_detail(guest.id, "13")
        .await
        .unwrap();
    assert!(detail.is_none());
}

#[actix_web::test]
async fn ranking_orders_by_stamped_prefectures() {
    let ctx = TestContext::new().await.unwrap();
    let host = ctx.create_host().await.unwrap();
    let leader = ctx.create_guest().await.unwrap();
    let runner_up = ctx.create_guest().await.unwrap();

    let hokkaido = ctx.create_farm(host.id, "北海道", 4000, 5).await.unwrap();
    let okinawa = ctx.create_farm(host.id, "沖縄県", 5000, 4).await.unwrap();

    review_stay(&ctx, leader.id, hokkaido.id, date(2025, 5, 1), date(2025, 5, 3)).await;
    review_stay(&ctx, leader.id, okinawa.id, date(2025, 6, 1), date(2025, 6, 3)).await;
    review_stay(
        &ctx,
        runner_up.id,
        hokkaido.id,
        date(2025, 7, 1),
        date(2025, 7, 3),
    )
    .await;

    let ranking = ctx
        .stamp_service
        .get_ranking(50, Some(runner_up.id))
        .await
        .unwrap();

    assert_eq!(ranking.total_users, 2);
    assert_eq!(ranking.rankings.len(), 2);
    assert_eq!(ranking.rankings[0].guest_id, leader.id);
    assert_eq!(ranking.rankings[0].rank, 1);
    assert_eq!(ranking.rankings[0].total_prefectures, 2);
    assert_eq!(ranking.rankings[1].guest_id, runner_up.id);
    assert_eq!(ranking.rankings[1].rank, 2);

    let mine = ranking.my_ranking.unwrap();
    assert_eq!(mine.guest_id, runner_up.id);
    assert_eq!(mine.rank, 2);
}

#[actix_web::test]
async fn unknown_prefecture_name_is_skipped() {
    let ctx = TestContext::new().await.unwrap();
    let host = ctx.create_host().await.unwrap();
    let guest = ctx.create_guest().await.unwrap();
    // A farm whose prefecture is not in the master table awards nothing.
    let farm = ctx.create_farm(host.id, "Atlantis", 4000, 5).await.unwrap();

    review_stay(&ctx, guest.id, farm.id, date(2025, 7, 10), date(2025, 7, 12)).await;

    let collection = ctx
        .stamp_service
        .get_user_collection(guest.id)
        .await
        .unwrap();
    assert_eq!(collection.summary.total_prefectures, 0);
}
