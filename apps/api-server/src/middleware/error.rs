//! Error handling - maps the error taxonomy to HTTP responses.
//!
//! Two failure modes answer with redirects rather than problem bodies:
//! an unauthenticated mutation bounces to the login entry point with the
//! original target preserved in `next`, and a non-owner post mutation
//! bounces to that post's detail view. A non-owner comment mutation is a
//! hard 403. NotFound is uniform whether the row is absent or merely
//! invisible.

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, ResponseError};
use chronicle_shared::ErrorResponse;
use std::fmt;
use uuid::Uuid;

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    /// Unauthenticated mutation attempt; redirect to login, preserving the
    /// original request target.
    AuthenticationRequired {
        next: String,
    },
    /// Authenticated but non-owning comment mutation; hard denial.
    AuthorizationDenied,
    /// Authenticated but non-owning post mutation; silent bounce to the
    /// post's detail view.
    OwnershipRedirect {
        post_id: Uuid,
    },
    Validation(Vec<String>),
    Unauthorized,
    Conflict(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::AuthenticationRequired { next } => {
                write!(f, "Authentication required for {}", next)
            }
            AppError::AuthorizationDenied => write!(f, "Authorization denied"),
            AppError::OwnershipRedirect { post_id } => {
                write!(f, "Not the author; redirecting to post {}", post_id)
            }
            AppError::Validation(errors) => write!(f, "Validation errors: {:?}", errors),
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AuthenticationRequired { .. } => StatusCode::SEE_OTHER,
            AppError::AuthorizationDenied => StatusCode::FORBIDDEN,
            AppError::OwnershipRedirect { .. } => StatusCode::SEE_OTHER,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::AuthenticationRequired { next } => {
                // The target may itself carry a query string; encode it so
                // its parameters survive the round trip through the login
                // URL.
                let query = serde_urlencoded::to_string([("next", next.as_str())])
                    .unwrap_or_default();
                HttpResponse::SeeOther()
                    .insert_header((header::LOCATION, format!("/auth/login?{}", query)))
                    .finish()
            }
            AppError::OwnershipRedirect { post_id } => HttpResponse::SeeOther()
                .insert_header((header::LOCATION, format!("/api/posts/{}", post_id)))
                .finish(),
            AppError::NotFound(detail) => {
                HttpResponse::NotFound().json(ErrorResponse::not_found(detail.clone()))
            }
            AppError::AuthorizationDenied => {
                HttpResponse::Forbidden().json(ErrorResponse::forbidden())
            }
            AppError::Validation(errors) => HttpResponse::UnprocessableEntity()
                .json(ErrorResponse::validation(errors.clone())),
            AppError::Unauthorized => {
                HttpResponse::Unauthorized().json(ErrorResponse::unauthorized())
            }
            AppError::Conflict(detail) => HttpResponse::Conflict()
                .json(ErrorResponse::new(409, "Conflict").with_detail(detail.clone())),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                HttpResponse::InternalServerError().json(ErrorResponse::internal_error())
            }
        }
    }
}

impl From<chronicle_core::error::RepoError> for AppError {
    fn from(err: chronicle_core::error::RepoError) -> Self {
        use chronicle_core::error::RepoError;
        match err {
            RepoError::NotFound => AppError::NotFound("resource".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use actix_web::http::header;

    use super::*;

    #[test]
    fn post_ownership_failure_redirects_to_the_post() {
        let post_id = Uuid::new_v4();
        let response = AppError::OwnershipRedirect { post_id }.error_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers().get(header::LOCATION).unwrap();
        assert_eq!(
            location.to_str().unwrap(),
            format!("/api/posts/{}", post_id)
        );
    }

    #[test]
    fn comment_ownership_failure_is_a_hard_denial() {
        let response = AppError::AuthorizationDenied.error_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.headers().get(header::LOCATION).is_none());
    }

    #[test]
    fn missing_session_redirects_to_login_with_next() {
        let response = AppError::AuthenticationRequired {
            next: "/api/posts?page=2".to_string(),
        }
        .error_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers().get(header::LOCATION).unwrap();
        assert!(location.to_str().unwrap().starts_with("/auth/login?next="));
    }

    #[test]
    fn next_survives_a_target_with_multiple_query_parameters() {
        let target = "/api/posts?page=2&sort=asc";
        let response = AppError::AuthenticationRequired {
            next: target.to_string(),
        }
        .error_response();

        let location = response.headers().get(header::LOCATION).unwrap();
        let query = location
            .to_str()
            .unwrap()
            .strip_prefix("/auth/login?")
            .unwrap();

        // Decoded the way a login page would: exactly one `next` parameter
        // carrying the whole original target, `&sort=asc` included.
        let params: Vec<(String, String)> = serde_urlencoded::from_str(query).unwrap();
        assert_eq!(params, vec![("next".to_string(), target.to_string())]);
    }
}
