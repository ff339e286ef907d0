//! SeaORM entities mirroring the domain model.
//!
//! On-delete behavior is explicit on every relation: author→post and
//! category→post and post→comment cascade, location→post sets null.

pub mod category;
pub mod comment;
pub mod location;
pub mod post;
pub mod user;
