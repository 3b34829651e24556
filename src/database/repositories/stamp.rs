use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::database::models::{
    PrefectureStamp, RankingRow, UserStampCollection, UserStampDetail, VisitedFarmInfo,
};

const STAMP_COLUMNS: &str = "prefecture_code, name, name_romaji, image_url, region, \
     display_order, is_active, created_at";
const COLLECTION_COLUMNS: &str = "id, guest_id, prefecture_code, visit_count, \
     first_visit_date, last_visit_date, unique_farms_count, total_nights, created_at, updated_at";
const DETAIL_COLUMNS: &str = "id, guest_id, prefecture_code, farm_id, review_id, \
     visit_date, experience_type, created_at";

#[derive(Clone)]
pub struct StampRepository {
    pool: SqlitePool,
}

impl StampRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_all_prefectures(&self) -> Result<Vec<PrefectureStamp>> {
        let prefectures = sqlx::query_as::<_, PrefectureStamp>(&format!(
            "SELECT {STAMP_COLUMNS} FROM prefecture_stamps WHERE is_active = 1 \
             ORDER BY display_order"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(prefectures)
    }

    pub async fn get_prefecture_by_code(&self, code: &str) -> Result<Option<PrefectureStamp>> {
        let prefecture = sqlx::query_as::<_, PrefectureStamp>(&format!(
            "SELECT {STAMP_COLUMNS} FROM prefecture_stamps WHERE prefecture_code = ?"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(prefecture)
    }

    /// Resolves a prefecture display name (e.g. 北海道) to its master code.
    pub async fn get_prefecture_code_by_name(&self, name: &str) -> Result<Option<String>> {
        let code = sqlx::query_scalar::<_, String>(
            "SELECT prefecture_code FROM prefecture_stamps WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(code)
    }

    pub async fn get_collections_by_guest(&self, guest_id: i64) -> Result<Vec<UserStampCollection>> {
        let collections = sqlx::query_as::<_, UserStampCollection>(&format!(
            "SELECT {COLLECTION_COLUMNS} FROM user_stamp_collection WHERE guest_id = ?"
        ))
        .bind(guest_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(collections)
    }

    pub async fn get_collection(
        &self,
        guest_id: i64,
        prefecture_code: &str,
    ) -> Result<Option<UserStampCollection>> {
        let collection = sqlx::query_as::<_, UserStampCollection>(&format!(
            "SELECT {COLLECTION_COLUMNS} FROM user_stamp_collection \
             WHERE guest_id = ? AND prefecture_code = ?"
        ))
        .bind(guest_id)
        .bind(prefecture_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(collection)
    }

    pub async fn get_detail_by_review(&self, review_id: i64) -> Result<Option<UserStampDetail>> {
        let detail = sqlx::query_as::<_, UserStampDetail>(&format!(
            "SELECT {DETAIL_COLUMNS} FROM user_stamp_detail WHERE review_id = ?"
        ))
        .bind(review_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(detail)
    }

    pub async fn insert_detail(
        &self,
        guest_id: i64,
        prefecture_code: &str,
        farm_id: i64,
        review_id: i64,
        visit_date: NaiveDate,
        experience_type: &str,
    ) -> Result<UserStampDetail> {
        let now = Utc::now().naive_utc();

        let detail = sqlx::query_as::<_, UserStampDetail>(&format!(
            r#"
            INSERT INTO user_stamp_detail (guest_id, prefecture_code, farm_id, review_id, visit_date, experience_type, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING {DETAIL_COLUMNS}
            "#
        ))
        .bind(guest_id)
        .bind(prefecture_code)
        .bind(farm_id)
        .bind(review_id)
        .bind(visit_date)
        .bind(experience_type)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(detail)
    }

    pub async fn insert_collection(
        &self,
        guest_id: i64,
        prefecture_code: &str,
        visit_date: NaiveDate,
    ) -> Result<UserStampCollection> {
        let now = Utc::now().naive_utc();

        let collection = sqlx::query_as::<_, UserStampCollection>(&format!(
            r#"
            INSERT INTO user_stamp_collection (guest_id, prefecture_code, visit_count, first_visit_date, last_visit_date, unique_farms_count, created_at, updated_at)
            VALUES (?, ?, 1, ?, ?, 1, ?, ?)
            RETURNING {COLLECTION_COLUMNS}
            "#
        ))
        .bind(guest_id)
        .bind(prefecture_code)
        .bind(visit_date)
        .bind(visit_date)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(collection)
    }

    pub async fn update_collection_visit(
        &self,
        id: i64,
        visit_count: i64,
        first_visit_date: NaiveDate,
        last_visit_date: NaiveDate,
        unique_farms_count: i64,
    ) -> Result<()> {
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE user_stamp_collection
            SET visit_count = ?, first_visit_date = ?, last_visit_date = ?,
                unique_farms_count = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(visit_count)
        .bind(first_visit_date)
        .bind(last_visit_date)
        .bind(unique_farms_count)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn count_unique_farms(&self, guest_id: i64, prefecture_code: &str) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(DISTINCT farm_id) FROM user_stamp_detail \
             WHERE guest_id = ? AND prefecture_code = ?",
        )
        .bind(guest_id)
        .bind(prefecture_code)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn get_visited_farms(
        &self,
        guest_id: i64,
        prefecture_code: &str,
    ) -> Result<Vec<VisitedFarmInfo>> {
        let farms = sqlx::query_as::<_, VisitedFarmInfo>(
            r#"
            SELECT d.farm_id, f.name AS farm_name, d.visit_date, d.experience_type, d.review_id
            FROM user_stamp_detail d
            INNER JOIN farms f ON d.farm_id = f.id
            WHERE d.guest_id = ? AND d.prefecture_code = ?
            ORDER BY d.visit_date DESC
            "#,
        )
        .bind(guest_id)
        .bind(prefecture_code)
        .fetch_all(&self.pool)
        .await?;

        Ok(farms)
    }

    /// Guests ranked by distinct stamped prefectures; ties break on user id.
    pub async fn get_ranking_rows(&self, limit: i64) -> Result<Vec<RankingRow>> {
        let rows = sqlx::query_as::<_, RankingRow>(
            r#"
            SELECT u.id AS guest_id, u.name AS guest_name, u.avatar_url,
                   COUNT(DISTINCT c.prefecture_code) AS total_prefectures
            FROM users u
            INNER JOIN user_stamp_collection c ON u.id = c.guest_id
            GROUP BY u.id, u.name, u.avatar_url
            ORDER BY total_prefectures DESC, u.id ASC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn count_collectors(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(DISTINCT guest_id) FROM user_stamp_collection",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
