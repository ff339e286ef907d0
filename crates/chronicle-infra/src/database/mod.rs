//! Database access: connection management and SeaORM repositories.

mod connections;
pub mod entity;
pub mod postgres_repo;

pub use connections::{DatabaseConfig, connect};
pub use postgres_repo::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresLocationRepository,
    PostgresPostRepository, PostgresUserRepository,
};

#[cfg(test)]
mod tests;
