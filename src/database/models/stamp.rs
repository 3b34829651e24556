use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PrefectureStamp {
    pub prefecture_code: String,
    pub name: String,
    pub name_romaji: String,
    pub image_url: String,
    pub region: String,
    pub display_order: i64,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

/// Per guest × prefecture visit summary, maintained by the review sync.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserStampCollection {
    pub id: i64,
    pub guest_id: i64,
    pub prefecture_code: String,
    pub visit_count: i64,
    pub first_visit_date: NaiveDate,
    pub last_visit_date: NaiveDate,
    pub unique_farms_count: i64,
    pub total_nights: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// One row per stamped review; review_id is unique so re-syncing is idempotent.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserStampDetail {
    pub id: i64,
    pub guest_id: i64,
    pub prefecture_code: String,
    pub farm_id: i64,
    pub review_id: i64,
    pub visit_date: NaiveDate,
    pub experience_type: String,
    pub created_at: NaiveDateTime,
}

// Response shapes for the stamp rally views.

#[derive(Debug, Clone, Serialize)]
pub struct StampCollectionSummary {
    pub total_prefectures: i64,
    pub total_visits: i64,
    pub total_farms: i64,
    pub completion_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrefectureStampStatus {
    pub prefecture_code: String,
    pub name: String,
    pub image_url: String,
    pub region: String,
    pub is_visited: bool,
    pub visit_count: i64,
    pub first_visit_date: Option<NaiveDate>,
    pub last_visit_date: Option<NaiveDate>,
    pub unique_farms_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StampCollectionResponse {
    pub summary: StampCollectionSummary,
    pub stamps: Vec<PrefectureStampStatus>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct VisitedFarmInfo {
    pub farm_id: i64,
    pub farm_name: String,
    pub visit_date: NaiveDate,
    pub experience_type: String,
    pub review_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrefectureDetailResponse {
    pub prefecture_code: String,
    pub name: String,
    pub visit_count: i64,
    pub first_visit_date: NaiveDate,
    pub last_visit_date: NaiveDate,
    pub unique_farms_count: i64,
    pub visited_farms: Vec<VisitedFarmInfo>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RankingRow {
    pub guest_id: i64,
    pub guest_name: String,
    pub avatar_url: Option<String>,
    pub total_prefectures: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingEntry {
    pub rank: i64,
    pub guest_id: i64,
    pub guest_name: String,
    pub avatar_url: Option<String>,
    pub total_prefectures: i64,
    pub completion_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingResponse {
    pub rankings: Vec<RankingEntry>,
    pub my_ranking: Option<RankingEntry>,
    pub total_users: i64,
}
