use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reservation {
    pub id: i64,
    pub guest_id: i64,
    pub farm_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub num_guests: i64,
    pub total_amount: i64,
    pub status: ReservationStatus,
    pub contact_phone: String,
    pub message: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Wire-level create payload. Dates stay as strings so the booking
/// validation can report missing/garbled input field by field before
/// anything is parsed for storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationInput {
    pub farm_id: i64,
    pub guest_id: i64,
    pub start_date: String,
    pub end_date: String,
    pub num_guests: i64,
    pub total_amount: i64,
    pub contact_phone: String,
    pub message: Option<String>,
}

/// Partial update; only status and message may change after creation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationUpdate {
    pub status: Option<ReservationStatus>,
    pub message: Option<String>,
}

/// Values written once validation has produced a priced quote.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub guest_id: i64,
    pub farm_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub num_guests: i64,
    pub total_amount: i64,
    pub contact_phone: String,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Approved,
    Completed,
    Cancelled,
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReservationStatus::Pending => write!(f, "pending"),
            ReservationStatus::Approved => write!(f, "approved"),
            ReservationStatus::Completed => write!(f, "completed"),
            ReservationStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ReservationStatus::Pending),
            "approved" => Ok(ReservationStatus::Approved),
            "completed" => Ok(ReservationStatus::Completed),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            _ => Err(format!("Invalid reservation status: {}", s)),
        }
    }
}

impl sqlx::Type<sqlx::Sqlite> for ReservationStatus {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <String as sqlx::Type<sqlx::Sqlite>>::type_info()
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for ReservationStatus {
    fn encode_by_ref(
        &self,
        args: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        let s = self.to_string();
        <String as sqlx::Encode<'q, sqlx::Sqlite>>::encode_by_ref(&s, args)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for ReservationStatus {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        s.parse::<ReservationStatus>().map_err(|e| e.into())
    }
}

impl Default for ReservationStatus {
    fn default() -> Self {
        ReservationStatus::Pending
    }
}
