use actix_web::{HttpResponse, Result, web};

use crate::AppState;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::{Claims, LoginInput};

/// Exchange a Google account id for a JWT.
pub async fn login(
    state: web::Data<AppState>,
    input: web::Json<LoginInput>,
) -> Result<HttpResponse> {
    match state.auth_service.login(input.into_inner()).await {
        Ok(Some(response)) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("User not found"))),
        Err(err) => {
            log::error!("Error during login: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to log in")))
        }
    }
}

/// Current user for the presented token.
pub async fn me(claims: Claims, state: web::Data<AppState>) -> Result<HttpResponse> {
    match state.auth_service.current_user(&claims).await {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(ApiResponse::success(user))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("User not found"))),
        Err(err) => {
            log::error!("Error fetching current user: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to fetch current user")))
        }
    }
}
