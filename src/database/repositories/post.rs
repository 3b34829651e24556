use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::database::models::{Comment, CommentInput, Post, PostInput, PostUpdate};

const POST_COLUMNS: &str =
    "id, user_id, farm_id, title, content, like_count, created_at, updated_at";
const COMMENT_COLUMNS: &str = "id, post_id, user_id, content, created_at, updated_at";

#[derive(Clone)]
pub struct PostRepository {
    pool: SqlitePool,
}

impl PostRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_post(&self, input: PostInput) -> Result<Post> {
        let now = Utc::now().naive_utc();

        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            INSERT INTO posts (user_id, farm_id, title, content, like_count, created_at, updated_at)
            VALUES (?, ?, ?, ?, 0, ?, ?)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(input.user_id)
        .bind(input.farm_id)
        .bind(input.title)
        .bind(input.content)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    pub async fn get_post_by_id(&self, id: i64) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    pub async fn get_posts(
        &self,
        user_id: Option<i64>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Post>> {
        let mut query = format!("SELECT {POST_COLUMNS} FROM posts WHERE 1=1");
        let mut params: Vec<String> = Vec::new();

        if let Some(user_id) = user_id {
            query.push_str(" AND user_id = ?");
            params.push(user_id.to_string());
        }

        query.push_str(" ORDER BY created_at DESC LIMIT ? OFFSET ?");

        let mut sql_query = sqlx::query_as::<_, Post>(&query);
        for param in params {
            sql_query = sql_query.bind(param);
        }

        let posts = sql_query.bind(limit).bind(skip).fetch_all(&self.pool).await?;
        Ok(posts)
    }

    pub async fn update_post(&self, id: i64, update: PostUpdate) -> Result<Option<Post>> {
        let Some(existing) = self.get_post_by_id(id).await? else {
            return Ok(None);
        };

        let now = Utc::now().naive_utc();

        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            UPDATE posts
            SET title = ?, content = ?, updated_at = ?
            WHERE id = ?
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(update.title.unwrap_or(existing.title))
        .bind(update.content.unwrap_or(existing.content))
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    /// Deletes a post together with its comments.
    pub async fn delete_post(&self, id: i64) -> Result<bool> {
        sqlx::query("DELETE FROM comments WHERE post_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn like_post(&self, id: i64) -> Result<Option<Post>> {
        let now = Utc::now().naive_utc();

        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            UPDATE posts
            SET like_count = like_count + 1, updated_at = ?
            WHERE id = ?
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    pub async fn create_comment(&self, post_id: i64, input: CommentInput) -> Result<Comment> {
        let now = Utc::now().naive_utc();

        let comment = sqlx::query_as::<_, Comment>(&format!(
            r#"
            INSERT INTO comments (post_id, user_id, content, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING {COMMENT_COLUMNS}
            "#
        ))
        .bind(post_id)
        .bind(input.user_id)
        .bind(input.content)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    pub async fn get_comments_by_post(
        &self,
        post_id: i64,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE post_id = ? \
             ORDER BY created_at DESC LIMIT ? OFFSET ?"
        ))
        .bind(post_id)
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    pub async fn delete_comment(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
