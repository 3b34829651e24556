use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: i64,
    pub reservation_id: i64,
    pub guest_id: i64,
    pub farm_id: i64,
    pub rating: i64,
    pub comment: Option<String>,
    pub experience_date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewInput {
    pub reservation_id: i64,
    pub guest_id: i64,
    pub farm_id: i64,
    pub rating: i64,
    pub comment: Option<String>,
    pub experience_date: NaiveDate,
}
