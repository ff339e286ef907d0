//! In-memory repository implementations.
//!
//! Used as the fallback when no database is configured and as the behavior
//! harness in tests. Data is lost on process restart. The cascade and
//! set-null delete rules the migration encodes as foreign keys are enforced
//! by hand here, and the feed queries call the same policy predicates the
//! SQL conditions mirror.
//!
//! Lock order is fixed (users, locations, categories, posts, comments) so
//! the multi-table delete paths cannot deadlock.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use chronicle_core::domain::{
    Category, Comment, CommentWithAuthor, Location, Post, PostDetail, PostPreview, User,
};
use chronicle_core::error::RepoError;
use chronicle_core::pagination::Page;
use chronicle_core::policy::visible_to_public;
use chronicle_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};

#[cfg(test)]
mod tests;

/// Shared in-memory tables.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    locations: RwLock<HashMap<Uuid, Location>>,
    categories: RwLock<HashMap<Uuid, Category>>,
    posts: RwLock<HashMap<Uuid, Post>>,
    comments: RwLock<HashMap<Uuid, Comment>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

/// In-memory user repository.
pub struct MemoryUserRepository {
    store: Arc<MemoryStore>,
}

impl MemoryUserRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.users.read().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .store
            .users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .store
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.store.users.write().await;
        let taken = users.values().any(|u| {
            u.id != user.id && (u.username == user.username || u.email == user.email)
        });
        if taken {
            return Err(RepoError::Constraint(
                "username or email already taken".to_string(),
            ));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }
}

/// In-memory category repository.
pub struct MemoryCategoryRepository {
    store: Arc<MemoryStore>,
}

impl MemoryCategoryRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CategoryRepository for MemoryCategoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self.store.categories.read().await.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        Ok(self
            .store
            .categories
            .read()
            .await
            .values()
            .find(|c| c.slug == slug)
            .cloned())
    }

    async fn save(&self, category: Category) -> Result<Category, RepoError> {
        let mut categories = self.store.categories.write().await;
        if categories
            .values()
            .any(|c| c.id != category.id && c.slug == category.slug)
        {
            return Err(RepoError::Constraint("slug already taken".to_string()));
        }
        categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut categories = self.store.categories.write().await;
        let mut posts = self.store.posts.write().await;
        let mut comments = self.store.comments.write().await;

        if categories.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }

        // Cascade: the category's posts go, and each post takes its
        // comments.
        let doomed: Vec<Uuid> = posts
            .values()
            .filter(|p| p.category_id == Some(id))
            .map(|p| p.id)
            .collect();
        for post_id in doomed {
            posts.remove(&post_id);
            comments.retain(|_, c| c.post_id != post_id);
        }

        Ok(())
    }
}

/// In-memory location repository.
pub struct MemoryLocationRepository {
    store: Arc<MemoryStore>,
}

impl MemoryLocationRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl LocationRepository for MemoryLocationRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Location>, RepoError> {
        Ok(self.store.locations.read().await.get(&id).cloned())
    }

    async fn save(&self, location: Location) -> Result<Location, RepoError> {
        self.store
            .locations
            .write()
            .await
            .insert(location.id, location.clone());
        Ok(location)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut locations = self.store.locations.write().await;
        let mut posts = self.store.posts.write().await;

        if locations.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }

        // Set-null: referencing posts survive without a location.
        for post in posts.values_mut() {
            if post.location_id == Some(id) {
                post.location_id = None;
            }
        }

        Ok(())
    }
}

/// In-memory post repository, including the three feed queries.
pub struct MemoryPostRepository {
    store: Arc<MemoryStore>,
}

impl MemoryPostRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    /// Filter, order and annotate posts into feed rows, then paginate.
    async fn feed<F>(&self, filter: F, page: u64) -> Result<Page<PostPreview>, RepoError>
    where
        F: Fn(&Post, Option<&Category>) -> bool,
    {
        let users = self.store.users.read().await;
        let locations = self.store.locations.read().await;
        let categories = self.store.categories.read().await;
        let posts = self.store.posts.read().await;
        let comments = self.store.comments.read().await;

        let mut matched: Vec<&Post> = posts
            .values()
            .filter(|p| {
                let category = p.category_id.and_then(|id| categories.get(&id));
                filter(p, category)
            })
            .collect();
        matched.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));

        let previews = matched
            .into_iter()
            .map(|p| {
                let category = p.category_id.and_then(|id| categories.get(&id));
                PostPreview {
                    id: p.id,
                    title: p.title.clone(),
                    text: p.text.clone(),
                    image: p.image.clone(),
                    pub_date: p.pub_date,
                    is_published: p.is_published,
                    author_username: users
                        .get(&p.author_id)
                        .map(|u| u.username.clone())
                        .unwrap_or_default(),
                    category_title: category.map(|c| c.title.clone()),
                    category_slug: category.map(|c| c.slug.clone()),
                    location_name: p
                        .location_id
                        .and_then(|id| locations.get(&id))
                        .map(|l| l.name.clone()),
                    comment_count: comments.values().filter(|c| c.post_id == p.id).count() as i64,
                }
            })
            .collect();

        Ok(Page::from_items(previews, page))
    }
}

#[async_trait]
impl PostRepository for MemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.posts.read().await.get(&id).cloned())
    }

    async fn find_detail(&self, id: Uuid) -> Result<Option<PostDetail>, RepoError> {
        let users = self.store.users.read().await;
        let locations = self.store.locations.read().await;
        let categories = self.store.categories.read().await;
        let posts = self.store.posts.read().await;

        let Some(post) = posts.get(&id).cloned() else {
            return Ok(None);
        };
        let author = users
            .get(&post.author_id)
            .cloned()
            .ok_or(RepoError::NotFound)?;
        let category = post.category_id.and_then(|id| categories.get(&id)).cloned();
        let location = post.location_id.and_then(|id| locations.get(&id)).cloned();

        Ok(Some(PostDetail {
            post,
            author,
            category,
            location,
        }))
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        self.store.posts.write().await.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut posts = self.store.posts.write().await;
        let mut comments = self.store.comments.write().await;

        if posts.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        comments.retain(|_, c| c.post_id != id);

        Ok(())
    }

    async fn global_feed(
        &self,
        now: DateTime<Utc>,
        page: u64,
    ) -> Result<Page<PostPreview>, RepoError> {
        self.feed(|post, category| visible_to_public(post, category, now), page)
            .await
    }

    async fn category_feed(
        &self,
        category_id: Uuid,
        now: DateTime<Utc>,
        page: u64,
    ) -> Result<Page<PostPreview>, RepoError> {
        self.feed(
            |post, category| {
                post.category_id == Some(category_id) && visible_to_public(post, category, now)
            },
            page,
        )
        .await
    }

    async fn profile_feed(
        &self,
        author_id: Uuid,
        include_hidden: bool,
        now: DateTime<Utc>,
        page: u64,
    ) -> Result<Page<PostPreview>, RepoError> {
        self.feed(
            |post, category| {
                post.author_id == author_id
                    && (include_hidden || visible_to_public(post, category, now))
            },
            page,
        )
        .await
    }
}

/// In-memory comment repository.
pub struct MemoryCommentRepository {
    store: Arc<MemoryStore>,
}

impl MemoryCommentRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CommentRepository for MemoryCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.store.comments.read().await.get(&id).cloned())
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentWithAuthor>, RepoError> {
        let users = self.store.users.read().await;
        let comments = self.store.comments.read().await;

        let mut matched: Vec<&Comment> =
            comments.values().filter(|c| c.post_id == post_id).collect();
        matched.sort_by_key(|c| c.created_at);

        Ok(matched
            .into_iter()
            .map(|c| CommentWithAuthor {
                comment: c.clone(),
                author_username: users
                    .get(&c.author_id)
                    .map(|u| u.username.clone())
                    .unwrap_or_default(),
            })
            .collect())
    }

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError> {
        self.store
            .comments
            .write()
            .await
            .insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        if self.store.comments.write().await.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
