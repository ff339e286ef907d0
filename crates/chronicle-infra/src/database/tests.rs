use chronicle_core::ports::PostRepository;
use sea_orm::{DatabaseBackend, MockDatabase, QueryTrait};

use crate::database::entity::post;
use crate::database::postgres_repo::{PostgresPostRepository, preview_select, public_condition};

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = uuid::Uuid::new_v4();
    let author_id = uuid::Uuid::new_v4();
    let now = chrono::Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post::Model {
            id: post_id,
            author_id,
            category_id: None,
            location_id: None,
            title: "Test Post".to_owned(),
            text: "Content".to_owned(),
            image: None,
            pub_date: now.into(),
            is_published: true,
            created_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result = repo.find_by_id(post_id).await.unwrap();

    assert!(result.is_some());
    let found = result.unwrap();
    assert_eq!(found.title, "Test Post");
    assert_eq!(found.id, post_id);
    assert_eq!(found.author_id, author_id);
}

#[test]
fn feed_select_orders_by_pub_date_descending() {
    let sql = preview_select().build(DatabaseBackend::Postgres).to_string();

    assert!(sql.contains(r#"ORDER BY "posts"."pub_date" DESC"#), "{sql}");
}

#[test]
fn feed_select_counts_comments_per_post() {
    let sql = preview_select().build(DatabaseBackend::Postgres).to_string();

    assert!(
        sql.contains(r#"COUNT("comments"."id") AS "comment_count""#),
        "{sql}"
    );
    assert!(sql.contains(r#"GROUP BY "posts"."id""#), "{sql}");
    assert!(sql.contains(r#"LEFT JOIN "comments""#), "{sql}");
}

#[test]
fn public_condition_matches_the_visibility_predicate() {
    use sea_orm::QueryFilter;

    let now = chrono::Utc::now();
    let sql = preview_select()
        .filter(public_condition(now))
        .build(DatabaseBackend::Postgres)
        .to_string();

    assert!(sql.contains(r#""posts"."is_published" = TRUE"#), "{sql}");
    assert!(sql.contains(r#""posts"."pub_date" <="#), "{sql}");
    // A post with no category is public; otherwise the category has to
    // be published.
    assert!(
        sql.contains(r#"("posts"."category_id" IS NULL OR "categories"."is_published" = TRUE)"#),
        "{sql}"
    );
}
