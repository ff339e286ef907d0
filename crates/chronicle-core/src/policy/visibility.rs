//! Visibility policy - which posts a given viewer may read.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, Post};

/// Whether the post is visible to an anonymous reader at `now`:
/// published, category absent or published, and `pub_date` elapsed.
pub fn visible_to_public(post: &Post, category: Option<&Category>, now: DateTime<Utc>) -> bool {
    post.is_published && category.is_none_or(|c| c.is_published) && post.pub_date <= now
}

/// Whether the post is visible to `viewer`.
///
/// An author always sees their own posts, drafts and scheduled ones
/// included; everyone else gets the public predicate. A failed visibility
/// check must surface as NotFound, never as a permission error - hidden
/// content's existence is not revealed.
pub fn is_visible(
    post: &Post,
    category: Option<&Category>,
    viewer: Option<Uuid>,
    now: DateTime<Utc>,
) -> bool {
    if viewer == Some(post.author_id) {
        return true;
    }
    visible_to_public(post, category, now)
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    fn published_post(author_id: Uuid, now: DateTime<Utc>) -> Post {
        Post::new(
            author_id,
            "title".to_string(),
            "text".to_string(),
            now - TimeDelta::hours(1),
        )
    }

    #[test]
    fn published_past_post_is_public() {
        let now = Utc::now();
        let post = published_post(Uuid::new_v4(), now);
        assert!(is_visible(&post, None, None, now));
    }

    #[test]
    fn unpublished_post_is_hidden_from_anonymous() {
        let now = Utc::now();
        let mut post = published_post(Uuid::new_v4(), now);
        post.is_published = false;
        assert!(!is_visible(&post, None, None, now));
    }

    #[test]
    fn future_post_is_hidden_from_anonymous_but_not_its_author() {
        let now = Utc::now();
        let author = Uuid::new_v4();
        let mut post = published_post(author, now);
        post.pub_date = now + TimeDelta::days(1);

        assert!(!is_visible(&post, None, None, now));
        assert!(!is_visible(&post, None, Some(Uuid::new_v4()), now));
        assert!(is_visible(&post, None, Some(author), now));
    }

    #[test]
    fn unpublished_category_hides_the_post() {
        let now = Utc::now();
        let author = Uuid::new_v4();
        let post = published_post(author, now);
        let mut category = Category::new(
            "Travel".to_string(),
            "On the road".to_string(),
            "travel".to_string(),
        );
        category.is_published = false;

        assert!(!is_visible(&post, Some(&category), None, now));
        // Author still sees their own post.
        assert!(is_visible(&post, Some(&category), Some(author), now));
    }

    #[test]
    fn author_sees_own_draft() {
        let now = Utc::now();
        let author = Uuid::new_v4();
        let mut post = published_post(author, now);
        post.is_published = false;

        assert!(is_visible(&post, None, Some(author), now));
        assert!(!is_visible(&post, None, Some(Uuid::new_v4()), now));
    }

    #[test]
    fn post_published_exactly_now_is_visible() {
        let now = Utc::now();
        let mut post = published_post(Uuid::new_v4(), now);
        post.pub_date = now;
        assert!(visible_to_public(&post, None, now));
    }
}
