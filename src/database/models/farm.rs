use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Farm {
    pub id: i64,
    pub host_id: i64,
    pub name: String,
    pub description: String,
    pub prefecture: String,
    pub city: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub experience_type: ExperienceType,
    pub price_per_day: i64,
    pub max_guests: i64,
    pub access_info: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Farm plus the derived main image URL used by listing and detail views.
#[derive(Debug, Clone, Serialize)]
pub struct FarmWithImage {
    #[serde(flatten)]
    pub farm: Farm,
    pub main_image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FarmInput {
    pub host_id: i64,
    pub name: String,
    pub description: String,
    pub prefecture: String,
    pub city: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub experience_type: ExperienceType,
    pub price_per_day: i64,
    pub max_guests: i64,
    pub access_info: Option<String>,
}

/// Partial update; omitted fields keep their current values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FarmUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub prefecture: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub experience_type: Option<ExperienceType>,
    pub price_per_day: Option<i64>,
    pub max_guests: Option<i64>,
    pub access_info: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FarmImage {
    pub id: i64,
    pub farm_id: i64,
    pub image_url: String,
    pub is_main: bool,
    pub display_order: i64,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceType {
    Agriculture,
    Livestock,
    Fishery,
}

impl std::fmt::Display for ExperienceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExperienceType::Agriculture => write!(f, "agriculture"),
            ExperienceType::Livestock => write!(f, "livestock"),
            ExperienceType::Fishery => write!(f, "fishery"),
        }
    }
}

impl std::str::FromStr for ExperienceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "agriculture" => Ok(ExperienceType::Agriculture),
            "livestock" => Ok(ExperienceType::Livestock),
            "fishery" => Ok(ExperienceType::Fishery),
            _ => Err(format!("Invalid experience type: {}", s)),
        }
    }
}

impl sqlx::Type<sqlx::Sqlite> for ExperienceType {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <String as sqlx::Type<sqlx::Sqlite>>::type_info()
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for ExperienceType {
    fn encode_by_ref(
        &self,
        args: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        let s = self.to_string();
        <String as sqlx::Encode<'q, sqlx::Sqlite>>::encode_by_ref(&s, args)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for ExperienceType {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        s.parse::<ExperienceType>().map_err(|e| e.into())
    }
}
