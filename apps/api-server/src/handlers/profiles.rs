//! Profile handlers: the per-author feed and profile self-edit.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use chronicle_shared::dto::{ProfileFeedResponse, UpdateProfileRequest};

use super::convert;
use super::posts::FeedQuery;
use crate::middleware::auth::{MaybeViewer, Viewer};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/profiles/{username} - the owner sees all their posts, drafts
/// and scheduled ones included; everyone else gets the public filter.
pub async fn profile(
    state: web::Data<AppState>,
    viewer: MaybeViewer,
    path: web::Path<String>,
    query: web::Query<FeedQuery>,
) -> AppResult<HttpResponse> {
    let username = path.into_inner();
    let user = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("profile {}", username)))?;

    let include_hidden = viewer.user_id() == Some(user.id);
    let page = state
        .posts
        .profile_feed(user.id, include_hidden, Utc::now(), query.page)
        .await?;
    let (items, meta) = convert::feed_items(page);

    Ok(HttpResponse::Ok().json(ProfileFeedResponse {
        profile: convert::profile_response(&user),
        items,
        page: meta,
    }))
}

/// PATCH /api/profile - self-edit only; absent fields keep their value.
pub async fn edit_profile(
    state: web::Data<AppState>,
    viewer: Viewer,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let mut user = state
        .users
        .find_by_id(viewer.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("profile {}", viewer.username)))?;

    let mut errors = Vec::new();
    if let Some(username) = req.username {
        if username.trim().is_empty() {
            errors.push("username must not be empty".to_string());
        } else {
            user.username = username;
        }
    }
    if let Some(email) = req.email {
        if email.is_empty() || !email.contains('@') {
            errors.push("invalid email address".to_string());
        } else {
            user.email = email;
        }
    }
    if let Some(first_name) = req.first_name {
        user.first_name = first_name;
    }
    if let Some(last_name) = req.last_name {
        user.last_name = last_name;
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let saved = state.users.save(user).await?;

    Ok(HttpResponse::Ok().json(convert::profile_response(&saved)))
}
