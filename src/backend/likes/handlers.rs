/**
 * Blog Like Handlers
 *
 * - `POST /api/blog-like/do-like` toggles the caller's like (behind
 *   `authenticate`; the liker is always the session identity)
 * - `GET /api/blog-like/get-like/{blogid}` and
 *   `GET /api/blog-like/get-like/{blogid}/{userid}` report the count and,
 *   when a user id is given, whether that user liked the blog
 */

use axum::{
    extract::{Path, State},
    response::Json,
};

use crate::backend::error::BackendError;
use crate::backend::likes::store::LikeStore;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::{DoLikeRequest, DoLikeResponse, LikeCountResponse, SharedError};

fn require_blog_id(blog_id: &str) -> Result<&str, SharedError> {
    let blog_id = blog_id.trim();
    if blog_id.is_empty() {
        return Err(SharedError::validation("blogid", "Blog id is required."));
    }
    Ok(blog_id)
}

/// Toggle the caller's like on a blog and return the new count
pub async fn do_like(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(request): Json<DoLikeRequest>,
) -> Result<Json<DoLikeResponse>, BackendError> {
    let blog_id = require_blog_id(&request.blogid)?;

    let liked = state.likes.toggle(blog_id, &identity.id).await?;
    let likecount = state.likes.count(blog_id).await?;

    tracing::debug!(user_id = %identity.id, blog_id, liked, likecount, "Like toggled");

    Ok(Json(DoLikeResponse { likecount }))
}

async fn like_count(
    state: &AppState,
    blog_id: &str,
    user_id: Option<&str>,
) -> Result<LikeCountResponse, BackendError> {
    let blog_id = require_blog_id(blog_id)?;
    let likecount = state.likes.count(blog_id).await?;
    let is_user_liked = match user_id {
        Some(user_id) => state.likes.has_liked(blog_id, user_id).await?,
        None => false,
    };

    Ok(LikeCountResponse {
        likecount,
        is_user_liked,
    })
}

/// Like count for a blog
pub async fn get_like(
    State(state): State<AppState>,
    Path(blog_id): Path<String>,
) -> Result<Json<LikeCountResponse>, BackendError> {
    Ok(Json(like_count(&state, &blog_id, None).await?))
}

/// Like count for a blog, personalized for `userid`
pub async fn get_like_for_user(
    State(state): State<AppState>,
    Path((blog_id, user_id)): Path<(String, String)>,
) -> Result<Json<LikeCountResponse>, BackendError> {
    Ok(Json(like_count(&state, &blog_id, Some(&user_id)).await?))
}
