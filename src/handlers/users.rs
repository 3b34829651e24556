use actix_web::{HttpResponse, Result, web};
use serde::Deserialize;

use crate::database::models::{UserInput, UserType, UserUpdate};
use crate::database::repositories::UserRepository;
use crate::handlers::shared::{ApiResponse, default_limit};

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_type: Option<String>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

pub async fn get_users(
    repo: web::Data<UserRepository>,
    query: web::Query<UserQuery>,
) -> Result<HttpResponse> {
    let user_type = match &query.user_type {
        Some(raw) => match raw.parse::<UserType>() {
            Ok(user_type) => Some(user_type),
            Err(_) => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::<()>::error("Invalid user type")));
            }
        },
        None => None,
    };

    match repo
        .get_users(user_type, query.skip.max(0), query.limit.clamp(1, 100))
        .await
    {
        Ok(users) => Ok(HttpResponse::Ok().json(ApiResponse::success(users))),
        Err(err) => {
            log::error!("Error fetching users: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to fetch users")))
        }
    }
}

pub async fn get_user(repo: web::Data<UserRepository>, path: web::Path<i64>) -> Result<HttpResponse> {
    match repo.get_user_by_id(path.into_inner()).await {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(ApiResponse::success(user))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("User not found"))),
        Err(err) => {
            log::error!("Error fetching user: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to fetch user")))
        }
    }
}

pub async fn get_user_by_email(
    repo: web::Data<UserRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match repo.get_user_by_email(&path.into_inner()).await {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(ApiResponse::success(user))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("User not found"))),
        Err(err) => {
            log::error!("Error fetching user by email: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to fetch user")))
        }
    }
}

pub async fn create_user(
    repo: web::Data<UserRepository>,
    input: web::Json<UserInput>,
) -> Result<HttpResponse> {
    let input = input.into_inner();

    match repo.google_id_exists(&input.google_id).await {
        Ok(true) => {
            return Ok(
                HttpResponse::BadRequest().json(ApiResponse::<()>::error("User already exists"))
            );
        }
        Ok(false) => {}
        Err(err) => {
            log::error!("Error checking existing user: {}", err);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to create user")));
        }
    }

    match repo.create_user(input).await {
        Ok(user) => Ok(HttpResponse::Created().json(ApiResponse::success(user))),
        Err(err) => {
            log::error!("Error creating user: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to create user")))
        }
    }
}

pub async fn update_user(
    repo: web::Data<UserRepository>,
    path: web::Path<i64>,
    input: web::Json<UserUpdate>,
) -> Result<HttpResponse> {
    match repo.update_user(path.into_inner(), input.into_inner()).await {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(ApiResponse::success(user))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("User not found"))),
        Err(err) => {
            log::error!("Error updating user: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to update user")))
        }
    }
}

pub async fn delete_user(
    repo: web::Data<UserRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match repo.delete_user(path.into_inner()).await {
        Ok(true) => Ok(HttpResponse::NoContent().finish()),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("User not found"))),
        Err(err) => {
            log::error!("Error deleting user: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to delete user")))
        }
    }
}
