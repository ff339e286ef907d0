use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Category, Location, User};

/// Post entity - a blog publication.
///
/// Publication is a computed state: a post becomes publicly visible once
/// `is_published` holds, its category (if any) is published, and `pub_date`
/// has elapsed. There is no stored "published" transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub title: String,
    pub text: String,
    pub image: Option<String>,
    /// May be in the future for scheduled publications.
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post. Optional category/location/image are set by the
    /// caller after construction.
    pub fn new(author_id: Uuid, title: String, text: String, pub_date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            category_id: None,
            location_id: None,
            title,
            text,
            image: None,
            pub_date,
            is_published: true,
            created_at: Utc::now(),
        }
    }
}

/// A post with its related rows eager-loaded, as the detail view needs them.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: Post,
    pub author: User,
    pub category: Option<Category>,
    pub location: Option<Location>,
}

/// One feed row: the post plus display fields from its relations and the
/// query-time comment count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPreview {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub image: Option<String>,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub author_username: String,
    pub category_title: Option<String>,
    pub category_slug: Option<String>,
    pub location_name: Option<String>,
    pub comment_count: i64,
}
