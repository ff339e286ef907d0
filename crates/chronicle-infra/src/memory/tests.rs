use chrono::TimeDelta;

use super::*;

async fn seed_user(store: &Arc<MemoryStore>, username: &str) -> User {
    let user = User::new(
        username.to_string(),
        format!("{username}@example.com"),
        "hash".to_string(),
    );
    MemoryUserRepository::new(store.clone())
        .save(user.clone())
        .await
        .unwrap()
}

fn post_published_at(author: &User, now: DateTime<Utc>, hours_ago: i64) -> Post {
    Post::new(
        author.id,
        format!("post-{hours_ago}h"),
        "text".to_string(),
        now - TimeDelta::hours(hours_ago),
    )
}

#[tokio::test]
async fn global_feed_is_newest_first() {
    let store = MemoryStore::new();
    let now = Utc::now();
    let alice = seed_user(&store, "alice").await;
    let posts = MemoryPostRepository::new(store.clone());

    // Seeded out of order on purpose.
    posts.save(post_published_at(&alice, now, 5)).await.unwrap();
    posts.save(post_published_at(&alice, now, 1)).await.unwrap();
    posts.save(post_published_at(&alice, now, 3)).await.unwrap();

    let page = posts.global_feed(now, 1).await.unwrap();
    let titles: Vec<&str> = page.items.iter().map(|p| p.title.as_str()).collect();

    assert_eq!(titles, vec!["post-1h", "post-3h", "post-5h"]);
}

#[tokio::test]
async fn unpublished_and_future_posts_are_excluded_from_global_feed() {
    let store = MemoryStore::new();
    let now = Utc::now();
    let alice = seed_user(&store, "alice").await;
    let posts = MemoryPostRepository::new(store.clone());

    posts.save(post_published_at(&alice, now, 1)).await.unwrap();

    let mut draft = post_published_at(&alice, now, 2);
    draft.is_published = false;
    posts.save(draft).await.unwrap();

    let mut scheduled = post_published_at(&alice, now, 0);
    scheduled.pub_date = now + TimeDelta::days(1);
    posts.save(scheduled).await.unwrap();

    let page = posts.global_feed(now, 1).await.unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].title, "post-1h");
}

#[tokio::test]
async fn unpublished_category_hides_its_posts_from_every_feed() {
    let store = MemoryStore::new();
    let now = Utc::now();
    let alice = seed_user(&store, "alice").await;
    let categories = MemoryCategoryRepository::new(store.clone());
    let posts = MemoryPostRepository::new(store.clone());

    let mut hidden = Category::new("Hidden".to_string(), "".to_string(), "hidden".to_string());
    hidden.is_published = false;
    let hidden = categories.save(hidden).await.unwrap();

    let mut post = post_published_at(&alice, now, 1);
    post.category_id = Some(hidden.id);
    posts.save(post).await.unwrap();

    let global = posts.global_feed(now, 1).await.unwrap();
    assert!(global.items.is_empty());

    let by_category = posts.category_feed(hidden.id, now, 1).await.unwrap();
    assert!(by_category.items.is_empty());
}

#[tokio::test]
async fn profile_feed_shows_drafts_only_to_the_owner() {
    let store = MemoryStore::new();
    let now = Utc::now();
    let alice = seed_user(&store, "alice").await;
    let posts = MemoryPostRepository::new(store.clone());

    // Alice has a published-past, an unpublished, and a published-future
    // post.
    posts.save(post_published_at(&alice, now, 1)).await.unwrap();

    let mut draft = post_published_at(&alice, now, 2);
    draft.is_published = false;
    posts.save(draft).await.unwrap();

    let mut scheduled = post_published_at(&alice, now, 0);
    scheduled.pub_date = now + TimeDelta::days(1);
    posts.save(scheduled).await.unwrap();

    let own_view = posts.profile_feed(alice.id, true, now, 1).await.unwrap();
    assert_eq!(own_view.items.len(), 3);

    let public_view = posts.profile_feed(alice.id, false, now, 1).await.unwrap();
    assert_eq!(public_view.items.len(), 1);
    assert_eq!(public_view.items[0].title, "post-1h");
}

#[tokio::test]
async fn profile_feed_is_scoped_to_the_author() {
    let store = MemoryStore::new();
    let now = Utc::now();
    let alice = seed_user(&store, "alice").await;
    let bob = seed_user(&store, "bob").await;
    let posts = MemoryPostRepository::new(store.clone());

    posts.save(post_published_at(&alice, now, 1)).await.unwrap();
    posts.save(post_published_at(&bob, now, 2)).await.unwrap();

    let page = posts.profile_feed(alice.id, false, now, 1).await.unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].author_username, "alice");
}

#[tokio::test]
async fn deleting_a_category_cascades_to_its_posts_and_their_comments() {
    let store = MemoryStore::new();
    let now = Utc::now();
    let alice = seed_user(&store, "alice").await;
    let categories = MemoryCategoryRepository::new(store.clone());
    let posts = MemoryPostRepository::new(store.clone());
    let comments = MemoryCommentRepository::new(store.clone());

    let travel = categories
        .save(Category::new(
            "Travel".to_string(),
            "".to_string(),
            "travel".to_string(),
        ))
        .await
        .unwrap();

    let mut in_category = post_published_at(&alice, now, 1);
    in_category.category_id = Some(travel.id);
    let in_category = posts.save(in_category).await.unwrap();
    let standalone = posts.save(post_published_at(&alice, now, 2)).await.unwrap();

    let comment = comments
        .save(Comment::new(in_category.id, alice.id, "nice".to_string()))
        .await
        .unwrap();

    categories.delete(travel.id).await.unwrap();

    assert!(posts.find_by_id(in_category.id).await.unwrap().is_none());
    assert!(comments.find_by_id(comment.id).await.unwrap().is_none());
    // Posts outside the category are untouched.
    assert!(posts.find_by_id(standalone.id).await.unwrap().is_some());
}

#[tokio::test]
async fn deleting_a_location_nulls_the_reference_instead_of_deleting_posts() {
    let store = MemoryStore::new();
    let now = Utc::now();
    let alice = seed_user(&store, "alice").await;
    let locations = MemoryLocationRepository::new(store.clone());
    let posts = MemoryPostRepository::new(store.clone());

    let cabin = locations
        .save(Location::new("Cabin".to_string()))
        .await
        .unwrap();

    let mut post = post_published_at(&alice, now, 1);
    post.location_id = Some(cabin.id);
    let post = posts.save(post).await.unwrap();

    locations.delete(cabin.id).await.unwrap();

    let survivor = posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(survivor.location_id, None);
}

#[tokio::test]
async fn deleting_a_post_cascades_to_its_comments() {
    let store = MemoryStore::new();
    let now = Utc::now();
    let alice = seed_user(&store, "alice").await;
    let posts = MemoryPostRepository::new(store.clone());
    let comments = MemoryCommentRepository::new(store.clone());

    let post = posts.save(post_published_at(&alice, now, 1)).await.unwrap();
    let comment = comments
        .save(Comment::new(post.id, alice.id, "bye".to_string()))
        .await
        .unwrap();

    posts.delete(post.id).await.unwrap();

    assert!(comments.find_by_id(comment.id).await.unwrap().is_none());
}

#[tokio::test]
async fn comment_count_annotation_matches_the_rows() {
    let store = MemoryStore::new();
    let now = Utc::now();
    let alice = seed_user(&store, "alice").await;
    let posts = MemoryPostRepository::new(store.clone());
    let comments = MemoryCommentRepository::new(store.clone());

    let zero = posts.save(post_published_at(&alice, now, 1)).await.unwrap();
    let one = posts.save(post_published_at(&alice, now, 2)).await.unwrap();
    let many = posts.save(post_published_at(&alice, now, 3)).await.unwrap();

    comments
        .save(Comment::new(one.id, alice.id, "1".to_string()))
        .await
        .unwrap();
    for i in 0..4 {
        comments
            .save(Comment::new(many.id, alice.id, i.to_string()))
            .await
            .unwrap();
    }

    let page = posts.global_feed(now, 1).await.unwrap();
    let count_of = |id: Uuid| {
        page.items
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.comment_count)
            .unwrap()
    };

    assert_eq!(count_of(zero.id), 0);
    assert_eq!(count_of(one.id), 1);
    assert_eq!(count_of(many.id), 4);
}

#[tokio::test]
async fn comments_list_oldest_first_with_author_usernames() {
    let store = MemoryStore::new();
    let now = Utc::now();
    let alice = seed_user(&store, "alice").await;
    let bob = seed_user(&store, "bob").await;
    let posts = MemoryPostRepository::new(store.clone());
    let comments = MemoryCommentRepository::new(store.clone());

    let post = posts.save(post_published_at(&alice, now, 1)).await.unwrap();

    let mut first = Comment::new(post.id, bob.id, "first".to_string());
    first.created_at = now - TimeDelta::minutes(10);
    comments.save(first).await.unwrap();

    let mut second = Comment::new(post.id, alice.id, "second".to_string());
    second.created_at = now - TimeDelta::minutes(5);
    comments.save(second).await.unwrap();

    let listed = comments.list_for_post(post.id).await.unwrap();

    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].comment.text, "first");
    assert_eq!(listed[0].author_username, "bob");
    assert_eq!(listed[1].comment.text, "second");
    assert_eq!(listed[1].author_username, "alice");
}

#[tokio::test]
async fn feed_of_twenty_five_posts_paginates_into_three_pages() {
    let store = MemoryStore::new();
    let now = Utc::now();
    let alice = seed_user(&store, "alice").await;
    let posts = MemoryPostRepository::new(store.clone());

    for i in 1..=25 {
        posts.save(post_published_at(&alice, now, i)).await.unwrap();
    }

    let first = posts.global_feed(now, 1).await.unwrap();
    assert_eq!(first.total_pages, 3);
    assert_eq!(first.total_items, 25);
    assert_eq!(first.items.len(), 10);
    assert!(first.has_next());

    let last = posts.global_feed(now, 3).await.unwrap();
    assert_eq!(last.items.len(), 5);
    assert!(!last.has_next());

    // Page 4 clamps to the last page instead of erroring.
    let overflow = posts.global_feed(now, 4).await.unwrap();
    assert_eq!(overflow.number, 3);
    assert_eq!(overflow.items.len(), 5);
}

#[tokio::test]
async fn duplicate_username_is_a_constraint_violation() {
    let store = MemoryStore::new();
    let users = MemoryUserRepository::new(store.clone());

    seed_user(&store, "alice").await;
    let dup = User::new(
        "alice".to_string(),
        "other@example.com".to_string(),
        "hash".to_string(),
    );

    assert!(matches!(
        users.save(dup).await,
        Err(RepoError::Constraint(_))
    ));
}
