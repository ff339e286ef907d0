//! # Chronicle Infrastructure
//!
//! Concrete implementations of the ports defined in `chronicle-core`:
//! PostgreSQL repositories via SeaORM, in-memory repositories for tests and
//! database-less development, and the JWT/Argon2 auth services.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL database support via SeaORM
//! - `auth` - JWT + Argon2 authentication

pub mod memory;

#[cfg(feature = "postgres")]
pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use memory::{
    MemoryCategoryRepository, MemoryCommentRepository, MemoryLocationRepository,
    MemoryPostRepository, MemoryStore, MemoryUserRepository,
};

#[cfg(feature = "postgres")]
pub use database::{DatabaseConfig, connect};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtTokenService};
