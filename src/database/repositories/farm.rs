use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::database::models::{ExperienceType, Farm, FarmImage, FarmInput, FarmUpdate};

const FARM_COLUMNS: &str = "id, host_id, name, description, prefecture, city, address, \
     latitude, longitude, experience_type, price_per_day, max_guests, access_info, \
     is_active, created_at, updated_at";

#[derive(Clone)]
pub struct FarmRepository {
    pool: SqlitePool,
}

impl FarmRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_farm(&self, input: FarmInput) -> Result<Farm> {
        let now = Utc::now().naive_utc();

        let farm = sqlx::query_as::<_, Farm>(&format!(
            r#"
            INSERT INTO farms (host_id, name, description, prefecture, city, address, latitude, longitude, experience_type, price_per_day, max_guests, access_info, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?)
            RETURNING {FARM_COLUMNS}
            "#
        ))
        .bind(input.host_id)
        .bind(input.name)
        .bind(input.description)
        .bind(input.prefecture)
        .bind(input.city)
        .bind(input.address)
        .bind(input.latitude)
        .bind(input.longitude)
        .bind(input.experience_type)
        .bind(input.price_per_day)
        .bind(input.max_guests)
        .bind(input.access_info)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(farm)
    }

    pub async fn get_farm_by_id(&self, id: i64) -> Result<Option<Farm>> {
        let farm = sqlx::query_as::<_, Farm>(&format!(
            "SELECT {FARM_COLUMNS} FROM farms WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(farm)
    }

    pub async fn get_farms(
        &self,
        prefecture: Option<&str>,
        experience_type: Option<ExperienceType>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Farm>> {
        let mut query = format!("SELECT {FARM_COLUMNS} FROM farms WHERE is_active = 1");
        let mut params: Vec<String> = Vec::new();

        if let Some(prefecture) = prefecture {
            query.push_str(" AND prefecture = ?");
            params.push(prefecture.to_string());
        }

        if let Some(experience_type) = experience_type {
            query.push_str(" AND experience_type = ?");
            params.push(experience_type.to_string());
        }

        query.push_str(" ORDER BY id LIMIT ? OFFSET ?");

        let mut sql_query = sqlx::query_as::<_, Farm>(&query);
        for param in params {
            sql_query = sql_query.bind(param);
        }

        let farms = sql_query.bind(limit).bind(skip).fetch_all(&self.pool).await?;
        Ok(farms)
    }

    pub async fn get_farms_by_host(&self, host_id: i64) -> Result<Vec<Farm>> {
        let farms = sqlx::query_as::<_, Farm>(&format!(
            "SELECT {FARM_COLUMNS} FROM farms WHERE host_id = ? ORDER BY id"
        ))
        .bind(host_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(farms)
    }

    pub async fn update_farm(&self, id: i64, update: FarmUpdate) -> Result<Option<Farm>> {
        let Some(existing) = self.get_farm_by_id(id).await? else {
            return Ok(None);
        };

        let now = Utc::now().naive_utc();

        let farm = sqlx::query_as::<_, Farm>(&format!(
            r#"
            UPDATE farms
            SET name = ?, description = ?, prefecture = ?, city = ?, address = ?,
                latitude = ?, longitude = ?, experience_type = ?, price_per_day = ?,
                max_guests = ?, access_info = ?, updated_at = ?
            WHERE id = ?
            RETURNING {FARM_COLUMNS}
            "#
        ))
        .bind(update.name.unwrap_or(existing.name))
        .bind(update.description.unwrap_or(existing.description))
        .bind(update.prefecture.unwrap_or(existing.prefecture))
        .bind(update.city.unwrap_or(existing.city))
        .bind(update.address.unwrap_or(existing.address))
        .bind(update.latitude.or(existing.latitude))
        .bind(update.longitude.or(existing.longitude))
        .bind(update.experience_type.unwrap_or(existing.experience_type))
        .bind(update.price_per_day.unwrap_or(existing.price_per_day))
        .bind(update.max_guests.unwrap_or(existing.max_guests))
        .bind(update.access_info.or(existing.access_info))
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(farm)
    }

    /// Soft delete: the farm disappears from listings but stays referenced
    /// by reservations and reviews.
    pub async fn deactivate_farm(&self, id: i64) -> Result<bool> {
        let now = Utc::now().naive_utc();
        let result = sqlx::query("UPDATE farms SET is_active = 0, updated_at = ? WHERE id = ?")
            .bind(now)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Main image if flagged, else the first by display order.
    pub async fn get_main_image_url(&self, farm_id: i64) -> Result<Option<String>> {
        let url = sqlx::query_scalar::<_, String>(
            r#"
            SELECT image_url FROM farm_images
            WHERE farm_id = ?
            ORDER BY is_main DESC, display_order ASC
            LIMIT 1
            "#,
        )
        .bind(farm_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(url)
    }

    pub async fn add_farm_image(
        &self,
        farm_id: i64,
        image_url: &str,
        is_main: bool,
        display_order: i64,
    ) -> Result<FarmImage> {
        let now = Utc::now().naive_utc();

        let image = sqlx::query_as::<_, FarmImage>(
            r#"
            INSERT INTO farm_images (farm_id, image_url, is_main, display_order, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, farm_id, image_url, is_main, display_order, created_at
            "#,
        )
        .bind(farm_id)
        .bind(image_url)
        .bind(is_main)
        .bind(display_order)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(image)
    }
}
