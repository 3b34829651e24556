use actix_web::{HttpResponse, Result, web};
use serde::Serialize;

use crate::database::models::ReviewInput;
use crate::database::repositories::ReviewRepository;
use crate::handlers::shared::{ApiResponse, PageQuery};
use crate::services::StampService;

#[derive(Debug, Serialize)]
pub struct AverageRatingResponse {
    pub farm_id: i64,
    pub average_rating: Option<f64>,
}

pub async fn get_farm_reviews(
    repo: web::Data<ReviewRepository>,
    path: web::Path<i64>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    match repo
        .get_reviews_by_farm(path.into_inner(), query.skip(), query.limit())
        .await
    {
        Ok(reviews) => Ok(HttpResponse::Ok().json(ApiResponse::success(reviews))),
        Err(err) => {
            log::error!("Error fetching farm reviews: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to fetch reviews")))
        }
    }
}

pub async fn get_farm_average_rating(
    repo: web::Data<ReviewRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let farm_id = path.into_inner();

    match repo.get_farm_average_rating(farm_id).await {
        Ok(average_rating) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AverageRatingResponse {
                farm_id,
                average_rating,
            },
        ))),
        Err(err) => {
            log::error!("Error fetching farm average rating: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to fetch average rating")))
        }
    }
}

pub async fn get_guest_reviews(
    repo: web::Data<ReviewRepository>,
    path: web::Path<i64>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    match repo
        .get_reviews_by_guest(path.into_inner(), query.skip(), query.limit())
        .await
    {
        Ok(reviews) => Ok(HttpResponse::Ok().json(ApiResponse::success(reviews))),
        Err(err) => {
            log::error!("Error fetching guest reviews: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to fetch reviews")))
        }
    }
}

pub async fn get_review(
    repo: web::Data<ReviewRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match repo.get_review_by_id(path.into_inner()).await {
        Ok(Some(review)) => Ok(HttpResponse::Ok().json(ApiResponse::success(review))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("Review not found"))),
        Err(err) => {
            log::error!("Error fetching review: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to fetch review")))
        }
    }
}

/// Create a review for a completed stay. One review per reservation; a
/// successful review awards the prefecture stamp as a side effect.
pub async fn create_review(
    repo: web::Data<ReviewRepository>,
    stamp_service: web::Data<StampService>,
    input: web::Json<ReviewInput>,
) -> Result<HttpResponse> {
    let input = input.into_inner();

    if !(1..=5).contains(&input.rating) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::<()>::error("Rating must be between 1 and 5")));
    }

    match repo.get_review_by_reservation(input.reservation_id).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(
                "A review already exists for this reservation",
            )));
        }
        Ok(None) => {}
        Err(err) => {
            log::error!("Error checking existing review: {}", err);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to create review")));
        }
    }

    let review = match repo.create_review(input).await {
        Ok(review) => review,
        Err(err) => {
            log::error!("Error creating review: {}", err);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to create review")));
        }
    };

    // The review stands even when stamping fails; the sync can be replayed.
    if let Err(err) = stamp_service.sync_from_review(review.id).await {
        log::warn!("Failed to sync stamp collection for review {}: {}", review.id, err);
    }

    Ok(HttpResponse::Created().json(ApiResponse::success(review)))
}

pub async fn delete_review(
    repo: web::Data<ReviewRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match repo.delete_review(path.into_inner()).await {
        Ok(true) => Ok(HttpResponse::NoContent().finish()),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("Review not found"))),
        Err(err) => {
            log::error!("Error deleting review: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to delete review")))
        }
    }
}
