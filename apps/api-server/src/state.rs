//! Application state - shared across all handlers.

use std::sync::Arc;

use chronicle_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};
use chronicle_infra::database::{
    DatabaseConfig, PostgresCategoryRepository, PostgresCommentRepository,
    PostgresLocationRepository, PostgresPostRepository, PostgresUserRepository, connect,
};
use chronicle_infra::memory::{
    MemoryCategoryRepository, MemoryCommentRepository, MemoryLocationRepository,
    MemoryPostRepository, MemoryStore, MemoryUserRepository,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub locations: Arc<dyn LocationRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        match db_config {
            Some(config) => match connect(config).await {
                Ok(db) => Self {
                    users: Arc::new(PostgresUserRepository::new(db.clone())),
                    categories: Arc::new(PostgresCategoryRepository::new(db.clone())),
                    locations: Arc::new(PostgresLocationRepository::new(db.clone())),
                    posts: Arc::new(PostgresPostRepository::new(db.clone())),
                    comments: Arc::new(PostgresCommentRepository::new(db)),
                },
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Self::in_memory()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Self::in_memory()
            }
        }
    }

    /// In-memory repositories over one shared store.
    pub fn in_memory() -> Self {
        let store = MemoryStore::new();
        Self {
            users: Arc::new(MemoryUserRepository::new(store.clone())),
            categories: Arc::new(MemoryCategoryRepository::new(store.clone())),
            locations: Arc::new(MemoryLocationRepository::new(store.clone())),
            posts: Arc::new(MemoryPostRepository::new(store.clone())),
            comments: Arc::new(MemoryCommentRepository::new(store)),
        }
    }
}
