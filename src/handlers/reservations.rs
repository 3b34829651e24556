use actix_web::{HttpResponse, Result, web};
use serde::Deserialize;

use crate::database::models::{
    NewReservation, ReservationInput, ReservationStatus, ReservationUpdate,
};
use crate::database::repositories::{FarmRepository, ReservationRepository};
use crate::error::AppError;
use crate::handlers::shared::{ApiResponse, default_limit};
use crate::services::auth::Claims;
use crate::services::booking::{self, BookingForm, FarmTerms};

#[derive(Debug, Deserialize)]
pub struct ReservationQuery {
    pub guest_id: Option<i64>,
    pub farm_id: Option<i64>,
    pub status: Option<String>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[derive(Debug, Deserialize)]
pub struct HostReservationQuery {
    pub status: Option<String>,
}

fn parse_status(raw: &Option<String>) -> Result<Option<ReservationStatus>, HttpResponse> {
    match raw {
        Some(value) => value
            .parse::<ReservationStatus>()
            .map(Some)
            .map_err(|_| HttpResponse::BadRequest().json(ApiResponse::<()>::error("Invalid status"))),
        None => Ok(None),
    }
}

pub async fn get_reservations(
    repo: web::Data<ReservationRepository>,
    query: web::Query<ReservationQuery>,
) -> Result<HttpResponse> {
    let status = match parse_status(&query.status) {
        Ok(status) => status,
        Err(response) => return Ok(response),
    };

    match repo
        .get_reservations(
            query.guest_id,
            query.farm_id,
            status,
            query.skip.max(0),
            query.limit.clamp(1, 100),
        )
        .await
    {
        Ok(reservations) => Ok(HttpResponse::Ok().json(ApiResponse::success(reservations))),
        Err(err) => {
            log::error!("Error fetching reservations: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to fetch reservations")))
        }
    }
}

/// Reservations across all farms owned by a host, for the host dashboard.
pub async fn get_host_reservations(
    repo: web::Data<ReservationRepository>,
    path: web::Path<i64>,
    query: web::Query<HostReservationQuery>,
) -> Result<HttpResponse> {
    let status = match parse_status(&query.status) {
        Ok(status) => status,
        Err(response) => return Ok(response),
    };

    match repo
        .get_reservations_by_host(path.into_inner(), status)
        .await
    {
        Ok(reservations) => Ok(HttpResponse::Ok().json(ApiResponse::success(reservations))),
        Err(err) => {
            log::error!("Error fetching host reservations: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to fetch reservations")))
        }
    }
}

pub async fn get_reservation(
    repo: web::Data<ReservationRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match repo.get_reservation_by_id(path.into_inner()).await {
        Ok(Some(reservation)) => Ok(HttpResponse::Ok().json(ApiResponse::success(reservation))),
        Ok(None) => {
            Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("Reservation not found")))
        }
        Err(err) => {
            log::error!("Error fetching reservation: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to fetch reservation")))
        }
    }
}

/// Create a reservation. The booking validation re-runs here against the
/// farm's stored terms, and the total is re-derived server-side: the
/// submitted `total_amount` must match, since the field is derived, never
/// client-authoritative.
pub async fn create_reservation(
    claims: Claims,
    farm_repo: web::Data<FarmRepository>,
    repo: web::Data<ReservationRepository>,
    input: web::Json<ReservationInput>,
) -> Result<HttpResponse, AppError> {
    let mut input = input.into_inner();

    // Guests book as themselves; only admins may book on behalf of others.
    if !claims.is_admin() {
        input.guest_id = claims.user_id();
    }

    let farm = farm_repo
        .get_farm_by_id(input.farm_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Farm not found".to_string()))?;

    let form = BookingForm {
        start_date: input.start_date.clone(),
        end_date: input.end_date.clone(),
        num_guests: input.num_guests.to_string(),
        contact_phone: input.contact_phone.clone(),
        message: input.message.clone(),
    };
    let terms = FarmTerms {
        price_per_day: farm.price_per_day,
        max_guests: farm.max_guests,
    };

    let quote = booking::validate(&form, &terms)?;

    if input.total_amount != quote.total_amount {
        return Err(AppError::BadRequest(format!(
            "Total amount mismatch: expected {}",
            quote.total_amount
        )));
    }

    // Both dates parsed successfully inside validate, so these cannot fail.
    let start_date = booking::parse_date(&input.start_date)
        .ok_or_else(|| AppError::BadRequest("Invalid check-in date".to_string()))?;
    let end_date = booking::parse_date(&input.end_date)
        .ok_or_else(|| AppError::BadRequest("Invalid check-out date".to_string()))?;

    let reservation = repo
        .create_reservation(NewReservation {
            guest_id: input.guest_id,
            farm_id: input.farm_id,
            start_date,
            end_date,
            num_guests: quote.num_guests,
            total_amount: quote.total_amount,
            contact_phone: input.contact_phone,
            message: input.message,
        })
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(reservation)))
}

pub async fn update_reservation(
    repo: web::Data<ReservationRepository>,
    path: web::Path<i64>,
    input: web::Json<ReservationUpdate>,
) -> Result<HttpResponse> {
    match repo
        .update_reservation(path.into_inner(), input.into_inner())
        .await
    {
        Ok(Some(reservation)) => Ok(HttpResponse::Ok().json(ApiResponse::success(reservation))),
        Ok(None) => {
            Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("Reservation not found")))
        }
        Err(err) => {
            log::error!("Error updating reservation: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to update reservation")))
        }
    }
}

/// Host accepts a pending reservation.
pub async fn approve_reservation(
    claims: Claims,
    repo: web::Data<ReservationRepository>,
    farm_repo: web::Data<FarmRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let reservation_id = path.into_inner();

    let reservation = repo
        .get_reservation_by_id(reservation_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Reservation not found".to_string()))?;

    if !claims.is_admin() {
        let farm = farm_repo
            .get_farm_by_id(reservation.farm_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Farm not found".to_string()))?;

        if farm.host_id != claims.user_id() {
            return Err(AppError::Forbidden(
                "Only the farm's host can approve this reservation".to_string(),
            ));
        }
    }

    if reservation.status != ReservationStatus::Pending {
        return Err(AppError::BadRequest(format!(
            "Cannot approve a reservation in status {}",
            reservation.status
        )));
    }

    let approved = repo
        .update_status(reservation_id, ReservationStatus::Approved)
        .await?
        .ok_or_else(|| AppError::NotFound("Reservation not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(approved)))
}

pub async fn cancel_reservation(
    repo: web::Data<ReservationRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let reservation_id = path.into_inner();

    let reservation = repo
        .get_reservation_by_id(reservation_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Reservation not found".to_string()))?;

    match reservation.status {
        ReservationStatus::Pending | ReservationStatus::Approved => {}
        other => {
            return Err(AppError::BadRequest(format!(
                "Cannot cancel a reservation in status {}",
                other
            )));
        }
    }

    let cancelled = repo
        .update_status(reservation_id, ReservationStatus::Cancelled)
        .await?
        .ok_or_else(|| AppError::NotFound("Reservation not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(cancelled)))
}

pub async fn delete_reservation(
    repo: web::Data<ReservationRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match repo.delete_reservation(path.into_inner()).await {
        Ok(true) => Ok(HttpResponse::NoContent().finish()),
        Ok(false) => {
            Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("Reservation not found")))
        }
        Err(err) => {
            log::error!("Error deleting reservation: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to delete reservation")))
        }
    }
}
