use actix_web::{HttpResponse, Result, web};
use serde::Deserialize;

use crate::database::models::{ExperienceType, Farm, FarmInput, FarmUpdate, FarmWithImage};
use crate::database::repositories::FarmRepository;
use crate::handlers::shared::{ApiResponse, default_limit};

#[derive(Debug, Deserialize)]
pub struct FarmQuery {
    pub prefecture: Option<String>,
    pub experience_type: Option<String>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

async fn with_main_image(repo: &FarmRepository, farm: Farm) -> FarmWithImage {
    let main_image_url = match repo.get_main_image_url(farm.id).await {
        Ok(url) => url,
        Err(err) => {
            log::warn!("Failed to fetch main image for farm {}: {}", farm.id, err);
            None
        }
    };

    FarmWithImage {
        farm,
        main_image_url,
    }
}

pub async fn get_farms(
    repo: web::Data<FarmRepository>,
    query: web::Query<FarmQuery>,
) -> Result<HttpResponse> {
    let experience_type = match &query.experience_type {
        Some(raw) => match raw.parse::<ExperienceType>() {
            Ok(experience_type) => Some(experience_type),
            Err(_) => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::<()>::error("Invalid experience type")));
            }
        },
        None => None,
    };

    let farms = match repo
        .get_farms(
            query.prefecture.as_deref(),
            experience_type,
            query.skip.max(0),
            query.limit.clamp(1, 100),
        )
        .await
    {
        Ok(farms) => farms,
        Err(err) => {
            log::error!("Error fetching farms: {}", err);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to fetch farms")));
        }
    };

    let mut listings = Vec::with_capacity(farms.len());
    for farm in farms {
        listings.push(with_main_image(&repo, farm).await);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(listings)))
}

pub async fn get_farm(repo: web::Data<FarmRepository>, path: web::Path<i64>) -> Result<HttpResponse> {
    match repo.get_farm_by_id(path.into_inner()).await {
        Ok(Some(farm)) => {
            let listing = with_main_image(&repo, farm).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(listing)))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("Farm not found"))),
        Err(err) => {
            log::error!("Error fetching farm: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to fetch farm")))
        }
    }
}

pub async fn get_farms_by_host(
    repo: web::Data<FarmRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let farms = match repo.get_farms_by_host(path.into_inner()).await {
        Ok(farms) => farms,
        Err(err) => {
            log::error!("Error fetching host farms: {}", err);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to fetch farms")));
        }
    };

    let mut listings = Vec::with_capacity(farms.len());
    for farm in farms {
        listings.push(with_main_image(&repo, farm).await);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(listings)))
}

pub async fn create_farm(
    repo: web::Data<FarmRepository>,
    input: web::Json<FarmInput>,
) -> Result<HttpResponse> {
    let input = input.into_inner();

    if input.price_per_day <= 0 {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::<()>::error("Price per day must be positive")));
    }

    if input.max_guests <= 0 {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::<()>::error("Maximum guests must be positive")));
    }

    match repo.create_farm(input).await {
        Ok(farm) => Ok(HttpResponse::Created().json(ApiResponse::success(farm))),
        Err(err) => {
            log::error!("Error creating farm: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to create farm")))
        }
    }
}

pub async fn update_farm(
    repo: web::Data<FarmRepository>,
    path: web::Path<i64>,
    input: web::Json<FarmUpdate>,
) -> Result<HttpResponse> {
    match repo.update_farm(path.into_inner(), input.into_inner()).await {
        Ok(Some(farm)) => Ok(HttpResponse::Ok().json(ApiResponse::success(farm))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("Farm not found"))),
        Err(err) => {
            log::error!("Error updating farm: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to update farm")))
        }
    }
}

pub async fn delete_farm(
    repo: web::Data<FarmRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match repo.deactivate_farm(path.into_inner()).await {
        Ok(true) => Ok(HttpResponse::NoContent().finish()),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("Farm not found"))),
        Err(err) => {
            log::error!("Error deleting farm: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to delete farm")))
        }
    }
}
