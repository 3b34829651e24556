use actix_web::{HttpResponse, Result, web};
use serde::Deserialize;

use crate::handlers::shared::ApiResponse;
use crate::services::StampService;

#[derive(Debug, Deserialize)]
pub struct RankingQuery {
    #[serde(default = "default_ranking_limit")]
    pub limit: i64,
    pub current_user_id: Option<i64>,
}

fn default_ranking_limit() -> i64 {
    50
}

pub async fn get_prefectures(service: web::Data<StampService>) -> Result<HttpResponse> {
    match service.get_all_prefectures().await {
        Ok(prefectures) => Ok(HttpResponse::Ok().json(ApiResponse::success(prefectures))),
        Err(err) => {
            log::error!("Error fetching prefectures: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to fetch prefectures")))
        }
    }
}

pub async fn get_user_collection(
    service: web::Data<StampService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.get_user_collection(path.into_inner()).await {
        Ok(collection) => Ok(HttpResponse::Ok().json(ApiResponse::success(collection))),
        Err(err) => {
            log::error!("Error fetching stamp collection: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to fetch stamp collection")))
        }
    }
}

pub async fn get_prefecture_detail(
    service: web::Data<StampService>,
    path: web::Path<(i64, String)>,
) -> Result<HttpResponse> {
    let (user_id, prefecture_code) = path.into_inner();

    match service.get_prefecture_detail(user_id, &prefecture_code).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(detail))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error(
            "Prefecture not visited or not found",
        ))),
        Err(err) => {
            log::error!("Error fetching prefecture detail: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to fetch prefecture detail")))
        }
    }
}

pub async fn get_ranking(
    service: web::Data<StampService>,
    query: web::Query<RankingQuery>,
) -> Result<HttpResponse> {
    match service
        .get_ranking(query.limit.clamp(1, 100), query.current_user_id)
        .await
    {
        Ok(ranking) => Ok(HttpResponse::Ok().json(ApiResponse::success(ranking))),
        Err(err) => {
            log::error!("Error fetching ranking: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to fetch ranking")))
        }
    }
}
