use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::database::models::{
    NewReservation, Reservation, ReservationStatus, ReservationUpdate,
};

const RESERVATION_COLUMNS: &str = "id, guest_id, farm_id, start_date, end_date, num_guests, \
     total_amount, status, contact_phone, message, created_at, updated_at";

#[derive(Clone)]
pub struct ReservationRepository {
    pool: SqlitePool,
}

impl ReservationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_reservation(&self, new: NewReservation) -> Result<Reservation> {
        let now = Utc::now().naive_utc();

        let reservation = sqlx::query_as::<_, Reservation>(&format!(
            r#"
            INSERT INTO reservations (guest_id, farm_id, start_date, end_date, num_guests, total_amount, status, contact_phone, message, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {RESERVATION_COLUMNS}
            "#
        ))
        .bind(new.guest_id)
        .bind(new.farm_id)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(new.num_guests)
        .bind(new.total_amount)
        .bind(ReservationStatus::Pending)
        .bind(new.contact_phone)
        .bind(new.message)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(reservation)
    }

    pub async fn get_reservation_by_id(&self, id: i64) -> Result<Option<Reservation>> {
        let reservation = sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reservation)
    }

    pub async fn get_reservations(
        &self,
        guest_id: Option<i64>,
        farm_id: Option<i64>,
        status: Option<ReservationStatus>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Reservation>> {
        let mut query = format!("SELECT {RESERVATION_COLUMNS} FROM reservations WHERE 1=1");
        let mut params: Vec<String> = Vec::new();

        if let Some(guest_id) = guest_id {
            query.push_str(" AND guest_id = ?");
            params.push(guest_id.to_string());
        }

        if let Some(farm_id) = farm_id {
            query.push_str(" AND farm_id = ?");
            params.push(farm_id.to_string());
        }

        if let Some(status) = status {
            query.push_str(" AND status = ?");
            params.push(status.to_string());
        }

        query.push_str(" ORDER BY created_at DESC LIMIT ? OFFSET ?");

        let mut sql_query = sqlx::query_as::<_, Reservation>(&query);
        for param in params {
            sql_query = sql_query.bind(param);
        }

        let reservations = sql_query
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await?;
        Ok(reservations)
    }

    /// Reservations for every farm owned by the given host, newest first.
    pub async fn get_reservations_by_host(
        &self,
        host_id: i64,
        status: Option<ReservationStatus>,
    ) -> Result<Vec<Reservation>> {
        let mut query = format!(
            r#"
            SELECT r.{}
            FROM reservations r
            INNER JOIN farms f ON r.farm_id = f.id
            WHERE f.host_id = ?
            "#,
            RESERVATION_COLUMNS.replace(", ", ", r.")
        );

        if status.is_some() {
            query.push_str(" AND r.status = ?");
        }
        query.push_str(" ORDER BY r.created_at DESC");

        let mut sql_query = sqlx::query_as::<_, Reservation>(&query).bind(host_id);
        if let Some(status) = status {
            sql_query = sql_query.bind(status.to_string());
        }

        let reservations = sql_query.fetch_all(&self.pool).await?;
        Ok(reservations)
    }

    pub async fn update_reservation(
        &self,
        id: i64,
        update: ReservationUpdate,
    ) -> Result<Option<Reservation>> {
        let Some(existing) = self.get_reservation_by_id(id).await? else {
            return Ok(None);
        };

        let now = Utc::now().naive_utc();

        let reservation = sqlx::query_as::<_, Reservation>(&format!(
            r#"
            UPDATE reservations
            SET status = ?, message = ?, updated_at = ?
            WHERE id = ?
            RETURNING {RESERVATION_COLUMNS}
            "#
        ))
        .bind(update.status.unwrap_or(existing.status))
        .bind(update.message.or(existing.message))
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reservation)
    }

    pub async fn update_status(
        &self,
        id: i64,
        status: ReservationStatus,
    ) -> Result<Option<Reservation>> {
        let now = Utc::now().naive_utc();

        let reservation = sqlx::query_as::<_, Reservation>(&format!(
            r#"
            UPDATE reservations
            SET status = ?, updated_at = ?
            WHERE id = ?
            RETURNING {RESERVATION_COLUMNS}
            "#
        ))
        .bind(status)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reservation)
    }

    pub async fn delete_reservation(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
