use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::database::models::{User, UserInput, UserType, UserUpdate};

const USER_COLUMNS: &str = "id, google_id, email, name, avatar_url, user_type, \
     phone_number, prefecture, city, created_at, updated_at";

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_user(&self, input: UserInput) -> Result<User> {
        let now = Utc::now().naive_utc();

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (google_id, email, name, avatar_url, user_type, phone_number, prefecture, city, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(input.google_id)
        .bind(input.email)
        .bind(input.name)
        .bind(input.avatar_url)
        .bind(input.user_type)
        .bind(input.phone_number)
        .bind(input.prefecture)
        .bind(input.city)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get_user_by_google_id(&self, google_id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE google_id = ?"
        ))
        .bind(google_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get_users(
        &self,
        user_type: Option<UserType>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<User>> {
        let mut query = format!("SELECT {USER_COLUMNS} FROM users WHERE 1=1");
        let mut params: Vec<String> = Vec::new();

        if let Some(user_type) = user_type {
            query.push_str(" AND user_type = ?");
            params.push(user_type.to_string());
        }

        query.push_str(" ORDER BY id LIMIT ? OFFSET ?");

        let mut sql_query = sqlx::query_as::<_, User>(&query);
        for param in params {
            sql_query = sql_query.bind(param);
        }

        let users = sql_query.bind(limit).bind(skip).fetch_all(&self.pool).await?;
        Ok(users)
    }

    pub async fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<User>> {
        let Some(existing) = self.get_user_by_id(id).await? else {
            return Ok(None);
        };

        let now = Utc::now().naive_utc();

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET name = ?, avatar_url = ?, user_type = ?, phone_number = ?, prefecture = ?, city = ?, updated_at = ?
            WHERE id = ?
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(update.name.unwrap_or(existing.name))
        .bind(update.avatar_url.or(existing.avatar_url))
        .bind(update.user_type.unwrap_or(existing.user_type))
        .bind(update.phone_number.or(existing.phone_number))
        .bind(update.prefecture.or(existing.prefecture))
        .bind(update.city.or(existing.city))
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn delete_user(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn google_id_exists(&self, google_id: &str) -> Result<bool> {
        Ok(self.get_user_by_google_id(google_id).await?.is_some())
    }
}
