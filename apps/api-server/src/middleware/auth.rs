//! Identity extractors.
//!
//! `Viewer` requires an authenticated request; a missing or bad token maps
//! to the login redirect (with the original target in `next`), matching the
//! login-required semantics of the mutation routes. `MaybeViewer` never
//! fails and is used on read routes where authorship widens visibility.

use std::future::{Ready, ready};
use std::sync::Arc;

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header};

use chronicle_core::ports::TokenService;

use super::error::AppError;

/// Authenticated viewer identity.
#[derive(Debug, Clone)]
pub struct Viewer {
    pub user_id: uuid::Uuid,
    pub username: String,
}

/// Original request target, for post-login continuation.
fn next_target(req: &HttpRequest) -> String {
    match req.query_string() {
        "" => req.path().to_string(),
        query => format!("{}?{}", req.path(), query),
    }
}

fn extract_viewer(req: &HttpRequest) -> Result<Viewer, AppError> {
    let token_service = req
        .app_data::<actix_web::web::Data<Arc<dyn TokenService>>>()
        .ok_or_else(|| {
            tracing::error!("TokenService not found in app data");
            AppError::Internal("Server configuration error".to_string())
        })?;

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::AuthenticationRequired {
            next: next_target(req),
        })?;

    let token = auth_header
        .to_str()
        .ok()
        .and_then(|s| s.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::AuthenticationRequired {
            next: next_target(req),
        })?;

    let claims =
        token_service
            .validate_token(token)
            .map_err(|_| AppError::AuthenticationRequired {
                next: next_target(req),
            })?;

    Ok(Viewer {
        user_id: claims.user_id,
        username: claims.username,
    })
}

impl FromRequest for Viewer {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_viewer(req))
    }
}

/// Optional viewer extractor - doesn't fail if not authenticated.
pub struct MaybeViewer(pub Option<Viewer>);

impl MaybeViewer {
    /// The viewer's user id, if any.
    pub fn user_id(&self) -> Option<uuid::Uuid> {
        self.0.as_ref().map(|v| v.user_id)
    }
}

impl FromRequest for MaybeViewer {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(MaybeViewer(extract_viewer(req).ok())))
    }
}
