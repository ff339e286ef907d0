//! Authentication handlers.

use actix_web::{HttpResponse, web};
use std::sync::Arc;

use chronicle_core::domain::User;
use chronicle_core::ports::{PasswordService, TokenService};
use chronicle_shared::dto::{AuthResponse, LoginRequest, RegisterRequest};

use super::convert;
use crate::middleware::auth::Viewer;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Validate input
    let mut errors = Vec::new();
    if req.username.trim().is_empty() {
        errors.push("username must not be empty".to_string());
    }
    if req.email.is_empty() || !req.email.contains('@') {
        errors.push("invalid email address".to_string());
    }
    if req.password.len() < 8 {
        errors.push("password must be at least 8 characters".to_string());
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    // Check if user already exists
    if state.users.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }
    if state
        .users
        .find_by_username(&req.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    // Hash password
    let password_hash = password_service
        .hash(&req.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    // Create user
    let user = User::new(req.username, req.email, password_hash);
    let saved = state.users.save(user).await?;

    // Generate token
    let token = token_service
        .generate_token(saved.id, &saved.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Created().json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds() as u64,
    }))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Find user by email
    let user = state
        .users
        .find_by_email(&req.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    // Verify password
    let valid = password_service
        .verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !valid {
        return Err(AppError::Unauthorized);
    }

    // Generate token
    let token = token_service
        .generate_token(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds() as u64,
    }))
}

/// GET /api/auth/me - Protected route
pub async fn me(state: web::Data<AppState>, viewer: Viewer) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(viewer.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {}", viewer.username)))?;

    Ok(HttpResponse::Ok().json(convert::profile_response(&user)))
}
