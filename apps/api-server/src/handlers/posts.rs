//! Post handlers: feeds, detail, and the author-only mutations.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use chronicle_core::domain::Post;
use chronicle_core::policy;
use chronicle_shared::dto::{CategoryFeedResponse, FeedResponse, PostRequest};

use super::convert;
use crate::middleware::auth::{MaybeViewer, Viewer};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Page number taken fresh from the query string on every request.
#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    #[serde(default)]
    pub page: u64,
}

/// Uniform NotFound for absent and invisible posts alike - the existence
/// of hidden content is never revealed.
fn post_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("post {}", id))
}

fn validate_post(req: &PostRequest) -> Result<(), AppError> {
    let mut errors = Vec::new();
    if req.title.trim().is_empty() {
        errors.push("title must not be empty".to_string());
    }
    if req.title.chars().count() > 256 {
        errors.push("title must be at most 256 characters".to_string());
    }
    if req.text.trim().is_empty() {
        errors.push("text must not be empty".to_string());
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

/// Referencing a nonexistent category or location is NotFound.
async fn check_references(state: &AppState, req: &PostRequest) -> Result<(), AppError> {
    if let Some(category_id) = req.category_id {
        state
            .categories
            .find_by_id(category_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("category {}", category_id)))?;
    }
    if let Some(location_id) = req.location_id {
        state
            .locations
            .find_by_id(location_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("location {}", location_id)))?;
    }
    Ok(())
}

fn apply_request(post: &mut Post, req: PostRequest) {
    post.title = req.title;
    post.text = req.text;
    post.pub_date = req.pub_date;
    post.category_id = req.category_id;
    post.location_id = req.location_id;
    post.image = req.image;
    if let Some(is_published) = req.is_published {
        post.is_published = is_published;
    }
}

/// GET /api/posts - the global feed, anonymous viewpoint.
pub async fn global_feed(
    state: web::Data<AppState>,
    query: web::Query<FeedQuery>,
) -> AppResult<HttpResponse> {
    let page = state.posts.global_feed(Utc::now(), query.page).await?;
    let (items, meta) = convert::feed_items(page);

    Ok(HttpResponse::Ok().json(FeedResponse { items, page: meta }))
}

/// GET /api/categories/{slug}/posts - an unpublished category is NotFound
/// for every viewer.
pub async fn category_feed(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<FeedQuery>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let category = state
        .categories
        .find_by_slug(&slug)
        .await?
        .filter(|c| c.is_published)
        .ok_or_else(|| AppError::NotFound(format!("category {}", slug)))?;

    let page = state
        .posts
        .category_feed(category.id, Utc::now(), query.page)
        .await?;
    let (items, meta) = convert::feed_items(page);

    Ok(HttpResponse::Ok().json(CategoryFeedResponse {
        category: convert::category_response(&category),
        items,
        page: meta,
    }))
}

/// GET /api/posts/{post_id} - detail with comments oldest-first.
pub async fn post_detail(
    state: web::Data<AppState>,
    viewer: MaybeViewer,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let detail = state
        .posts
        .find_detail(id)
        .await?
        .ok_or_else(|| post_not_found(id))?;

    if !policy::is_visible(
        &detail.post,
        detail.category.as_ref(),
        viewer.user_id(),
        Utc::now(),
    ) {
        return Err(post_not_found(id));
    }

    let comments = state.comments.list_for_post(id).await?;

    Ok(HttpResponse::Ok().json(convert::detail_response(detail, comments)))
}

/// POST /api/posts - authenticated; the author is always the viewer.
pub async fn create_post(
    state: web::Data<AppState>,
    viewer: Viewer,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    validate_post(&req)?;
    check_references(&state, &req).await?;

    let mut post = Post::new(
        viewer.user_id,
        req.title.clone(),
        req.text.clone(),
        req.pub_date,
    );
    apply_request(&mut post, req);

    let saved = state.posts.save(post).await?;
    tracing::debug!(post_id = %saved.id, author = %viewer.username, "Post created");

    let detail = state
        .posts
        .find_detail(saved.id)
        .await?
        .ok_or_else(|| AppError::Internal("post missing right after save".to_string()))?;

    Ok(HttpResponse::Created().json(convert::detail_response(detail, Vec::new())))
}

/// PUT /api/posts/{post_id} - author only; a non-author is bounced to the
/// post's detail view rather than shown an error.
pub async fn edit_post(
    state: web::Data<AppState>,
    viewer: Viewer,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let mut post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| post_not_found(id))?;

    if !policy::can_modify(post.author_id, Some(viewer.user_id)) {
        return Err(AppError::OwnershipRedirect { post_id: id });
    }

    let req = body.into_inner();
    validate_post(&req)?;
    check_references(&state, &req).await?;

    apply_request(&mut post, req);
    state.posts.save(post).await?;

    let detail = state
        .posts
        .find_detail(id)
        .await?
        .ok_or_else(|| post_not_found(id))?;
    let comments = state.comments.list_for_post(id).await?;

    Ok(HttpResponse::Ok().json(convert::detail_response(detail, comments)))
}

/// DELETE /api/posts/{post_id} - author only; comments go with the post.
pub async fn delete_post(
    state: web::Data<AppState>,
    viewer: Viewer,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| post_not_found(id))?;

    if !policy::can_modify(post.author_id, Some(viewer.user_id)) {
        return Err(AppError::OwnershipRedirect { post_id: id });
    }

    state.posts.delete(id).await?;
    tracing::debug!(post_id = %id, author = %viewer.username, "Post deleted");

    Ok(HttpResponse::NoContent().finish())
}
