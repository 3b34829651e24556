use actix_web::{HttpResponse, Result, web};
use serde::Deserialize;

use crate::database::models::{CommentInput, PostInput, PostUpdate};
use crate::database::repositories::PostRepository;
use crate::handlers::shared::{ApiResponse, PageQuery, default_limit};

#[derive(Debug, Deserialize)]
pub struct PostQuery {
    pub user_id: Option<i64>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

pub async fn get_posts(
    repo: web::Data<PostRepository>,
    query: web::Query<PostQuery>,
) -> Result<HttpResponse> {
    match repo
        .get_posts(query.user_id, query.skip.max(0), query.limit.clamp(1, 100))
        .await
    {
        Ok(posts) => Ok(HttpResponse::Ok().json(ApiResponse::success(posts))),
        Err(err) => {
            log::error!("Error fetching posts: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to fetch posts")))
        }
    }
}

pub async fn get_post(repo: web::Data<PostRepository>, path: web::Path<i64>) -> Result<HttpResponse> {
    match repo.get_post_by_id(path.into_inner()).await {
        Ok(Some(post)) => Ok(HttpResponse::Ok().json(ApiResponse::success(post))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("Post not found"))),
        Err(err) => {
            log::error!("Error fetching post: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to fetch post")))
        }
    }
}

pub async fn create_post(
    repo: web::Data<PostRepository>,
    input: web::Json<PostInput>,
) -> Result<HttpResponse> {
    match repo.create_post(input.into_inner()).await {
        Ok(post) => Ok(HttpResponse::Created().json(ApiResponse::success(post))),
        Err(err) => {
            log::error!("Error creating post: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to create post")))
        }
    }
}

pub async fn update_post(
    repo: web::Data<PostRepository>,
    path: web::Path<i64>,
    input: web::Json<PostUpdate>,
) -> Result<HttpResponse> {
    match repo.update_post(path.into_inner(), input.into_inner()).await {
        Ok(Some(post)) => Ok(HttpResponse::Ok().json(ApiResponse::success(post))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("Post not found"))),
        Err(err) => {
            log::error!("Error updating post: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to update post")))
        }
    }
}

pub async fn delete_post(
    repo: web::Data<PostRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match repo.delete_post(path.into_inner()).await {
        Ok(true) => Ok(HttpResponse::NoContent().finish()),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("Post not found"))),
        Err(err) => {
            log::error!("Error deleting post: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to delete post")))
        }
    }
}

pub async fn like_post(
    repo: web::Data<PostRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match repo.like_post(path.into_inner()).await {
        Ok(Some(post)) => Ok(HttpResponse::Ok().json(ApiResponse::success(post))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("Post not found"))),
        Err(err) => {
            log::error!("Error liking post: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to like post")))
        }
    }
}

pub async fn get_comments(
    repo: web::Data<PostRepository>,
    path: web::Path<i64>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    match repo
        .get_comments_by_post(path.into_inner(), query.skip(), query.limit())
        .await
    {
        Ok(comments) => Ok(HttpResponse::Ok().json(ApiResponse::success(comments))),
        Err(err) => {
            log::error!("Error fetching comments: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to fetch comments")))
        }
    }
}

pub async fn create_comment(
    repo: web::Data<PostRepository>,
    path: web::Path<i64>,
    input: web::Json<CommentInput>,
) -> Result<HttpResponse> {
    let post_id = path.into_inner();

    // Comments only attach to existing posts.
    match repo.get_post_by_id(post_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("Post not found")));
        }
        Err(err) => {
            log::error!("Error fetching post for comment: {}", err);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to create comment")));
        }
    }

    match repo.create_comment(post_id, input.into_inner()).await {
        Ok(comment) => Ok(HttpResponse::Created().json(ApiResponse::success(comment))),
        Err(err) => {
            log::error!("Error creating comment: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to create comment")))
        }
    }
}

pub async fn delete_comment(
    repo: web::Data<PostRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match repo.delete_comment(path.into_inner()).await {
        Ok(true) => Ok(HttpResponse::NoContent().finish()),
        Ok(false) => {
            Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("Comment not found")))
        }
        Err(err) => {
            log::error!("Error deleting comment: {}", err);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to delete comment")))
        }
    }
}
