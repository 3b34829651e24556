use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::database::models::{Review, ReviewInput};

const REVIEW_COLUMNS: &str = "id, reservation_id, guest_id, farm_id, rating, comment, \
     experience_date, created_at, updated_at";

#[derive(Clone)]
pub struct ReviewRepository {
    pool: SqlitePool,
}

impl ReviewRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_review(&self, input: ReviewInput) -> Result<Review> {
        let now = Utc::now().naive_utc();

        let review = sqlx::query_as::<_, Review>(&format!(
            r#"
            INSERT INTO reviews (reservation_id, guest_id, farm_id, rating, comment, experience_date, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {REVIEW_COLUMNS}
            "#
        ))
        .bind(input.reservation_id)
        .bind(input.guest_id)
        .bind(input.farm_id)
        .bind(input.rating)
        .bind(input.comment)
        .bind(input.experience_date)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(review)
    }

    pub async fn get_review_by_id(&self, id: i64) -> Result<Option<Review>> {
        let review = sqlx::query_as::<_, Review>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    pub async fn get_review_by_reservation(&self, reservation_id: i64) -> Result<Option<Review>> {
        let review = sqlx::query_as::<_, Review>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE reservation_id = ?"
        ))
        .bind(reservation_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    pub async fn get_reviews_by_farm(
        &self,
        farm_id: i64,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE farm_id = ? \
             ORDER BY created_at DESC LIMIT ? OFFSET ?"
        ))
        .bind(farm_id)
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    pub async fn get_reviews_by_guest(
        &self,
        guest_id: i64,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE guest_id = ? \
             ORDER BY created_at DESC LIMIT ? OFFSET ?"
        ))
        .bind(guest_id)
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    pub async fn get_farm_average_rating(&self, farm_id: i64) -> Result<Option<f64>> {
        let avg = sqlx::query_scalar::<_, Option<f64>>(
            "SELECT AVG(rating) FROM reviews WHERE farm_id = ?",
        )
        .bind(farm_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(avg)
    }

    pub async fn delete_review(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
