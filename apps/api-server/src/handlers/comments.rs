//! Comment handlers.
//!
//! Comments live under their post in the URL space. Ownership failures
//! here are hard denials, unlike the post routes - comment moderation at
//! post level is not offered, so there is no sensible place to bounce to.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use chronicle_core::domain::{Comment, CommentWithAuthor};
use chronicle_core::policy;
use chronicle_shared::dto::CommentRequest;

use super::convert;
use crate::middleware::auth::Viewer;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn validate_comment(req: &CommentRequest) -> Result<(), AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation(vec![
            "text must not be empty".to_string(),
        ]));
    }
    Ok(())
}

/// Resolve a comment under the post named in the path. A comment that
/// exists but hangs off a different post is NotFound.
async fn resolve_comment(
    state: &AppState,
    post_id: Uuid,
    comment_id: Uuid,
) -> Result<Comment, AppError> {
    state
        .comments
        .find_by_id(comment_id)
        .await?
        .filter(|c| c.post_id == post_id)
        .ok_or_else(|| AppError::NotFound(format!("comment {}", comment_id)))
}

/// POST /api/posts/{post_id}/comments - any authenticated user may comment
/// on a post they can see.
pub async fn add_comment(
    state: web::Data<AppState>,
    viewer: Viewer,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let req = body.into_inner();
    validate_comment(&req)?;

    let detail = state
        .posts
        .find_detail(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;
    if !policy::is_visible(
        &detail.post,
        detail.category.as_ref(),
        Some(viewer.user_id),
        Utc::now(),
    ) {
        return Err(AppError::NotFound(format!("post {}", post_id)));
    }

    let comment = Comment::new(post_id, viewer.user_id, req.text);
    let saved = state.comments.save(comment).await?;

    Ok(HttpResponse::Created().json(convert::comment_response(CommentWithAuthor {
        comment: saved,
        author_username: viewer.username,
    })))
}

/// PUT /api/posts/{post_id}/comments/{comment_id} - author only.
pub async fn edit_comment(
    state: web::Data<AppState>,
    viewer: Viewer,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let req = body.into_inner();
    validate_comment(&req)?;

    let mut comment = resolve_comment(&state, post_id, comment_id).await?;
    if !policy::can_modify(comment.author_id, Some(viewer.user_id)) {
        return Err(AppError::AuthorizationDenied);
    }

    comment.text = req.text;
    let saved = state.comments.save(comment).await?;

    Ok(HttpResponse::Ok().json(convert::comment_response(CommentWithAuthor {
        comment: saved,
        author_username: viewer.username,
    })))
}

/// DELETE /api/posts/{post_id}/comments/{comment_id} - author only.
pub async fn delete_comment(
    state: web::Data<AppState>,
    viewer: Viewer,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();

    let comment = resolve_comment(&state, post_id, comment_id).await?;
    if !policy::can_modify(comment.author_id, Some(viewer.user_id)) {
        return Err(AppError::AuthorizationDenied);
    }

    state.comments.delete(comment.id).await?;

    Ok(HttpResponse::NoContent().finish())
}
