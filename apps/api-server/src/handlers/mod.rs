//! HTTP handlers and route configuration.
//!
//! Every handler is a straight-line function: resolve the target entity,
//! apply the visibility/ownership policy, perform the operation, build the
//! response.

mod auth;
mod comments;
mod convert;
mod health;
mod posts;
mod profiles;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Feeds and post CRUD
            .route("/posts", web::get().to(posts::global_feed))
            .route("/posts", web::post().to(posts::create_post))
            .route("/posts/{post_id}", web::get().to(posts::post_detail))
            .route("/posts/{post_id}", web::put().to(posts::edit_post))
            .route("/posts/{post_id}", web::delete().to(posts::delete_post))
            // Comments, nested under their post
            .route(
                "/posts/{post_id}/comments",
                web::post().to(comments::add_comment),
            )
            .route(
                "/posts/{post_id}/comments/{comment_id}",
                web::put().to(comments::edit_comment),
            )
            .route(
                "/posts/{post_id}/comments/{comment_id}",
                web::delete().to(comments::delete_comment),
            )
            // Category and profile feeds
            .route(
                "/categories/{slug}/posts",
                web::get().to(posts::category_feed),
            )
            .route("/profiles/{username}", web::get().to(profiles::profile))
            .route("/profile", web::patch().to(profiles::edit_profile)),
    );
}
