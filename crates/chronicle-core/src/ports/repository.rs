//! Repository ports over the relational store.
//!
//! The three feed methods on [`PostRepository`] are the app's read shapes:
//! each is paginated at [`crate::PAGE_SIZE`], ordered by `pub_date`
//! descending, and annotates every row with its comment count computed at
//! query time.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, Comment, CommentWithAuthor, Location, Post, PostDetail, PostPreview, User};
use crate::error::RepoError;
use crate::pagination::Page;

/// User repository.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Save a user (create or update).
    async fn save(&self, user: User) -> Result<User, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    async fn save(&self, category: Category) -> Result<Category, RepoError>;

    /// Delete a category; its posts go with it (cascade).
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

/// Location repository.
#[async_trait]
pub trait LocationRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Location>, RepoError>;

    async fn save(&self, location: Location) -> Result<Location, RepoError>;

    /// Delete a location; referencing posts keep living with a nulled
    /// location (set-null).
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

/// Post repository, including the feed queries.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Post with author, category and location eager-loaded.
    async fn find_detail(&self, id: Uuid) -> Result<Option<PostDetail>, RepoError>;

    async fn save(&self, post: Post) -> Result<Post, RepoError>;

    /// Delete a post and, by cascade, its comments.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    /// Global feed: all posts visible to an anonymous reader at `now`.
    async fn global_feed(&self, now: DateTime<Utc>, page: u64)
    -> Result<Page<PostPreview>, RepoError>;

    /// Category feed: the global filter constrained to one category.
    /// Callers resolve (and visibility-check) the category first.
    async fn category_feed(
        &self,
        category_id: Uuid,
        now: DateTime<Utc>,
        page: u64,
    ) -> Result<Page<PostPreview>, RepoError>;

    /// Profile feed: posts by one author. With `include_hidden` (the owner's
    /// own view) drafts and future posts are included; otherwise the
    /// anonymous filter applies.
    async fn profile_feed(
        &self,
        author_id: Uuid,
        include_hidden: bool,
        now: DateTime<Utc>,
        page: u64,
    ) -> Result<Page<PostPreview>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError>;

    /// All comments under a post, oldest first, with author usernames.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentWithAuthor>, RepoError>;

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}
