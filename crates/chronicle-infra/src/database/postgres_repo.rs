//! PostgreSQL repository implementations.
//!
//! The feed queries express the visibility filter, the comment-count
//! annotation and the `pub_date` ordering in a single `SELECT`; query
//! construction is factored out so the generated SQL can be asserted in
//! tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, Condition, DbConn, EntityTrait, FromQueryResult, JoinType, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select,
};
use uuid::Uuid;

use chronicle_core::domain::{
    Category, Comment, CommentWithAuthor, Location, Post, PostDetail, PostPreview, User,
};
use chronicle_core::error::RepoError;
use chronicle_core::pagination::{PAGE_SIZE, Page};
use chronicle_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};

use super::entity::{category, comment, location, post, user};

fn db_err(e: sea_orm::DbErr) -> RepoError {
    let msg = e.to_string();
    if msg.contains("duplicate") || msg.contains("unique") {
        RepoError::Constraint(msg)
    } else {
        RepoError::Query(msg)
    }
}

/// Raw feed row as selected from the database.
#[derive(Debug, FromQueryResult)]
pub(crate) struct PreviewRow {
    id: Uuid,
    title: String,
    text: String,
    image: Option<String>,
    pub_date: sea_orm::prelude::DateTimeWithTimeZone,
    is_published: bool,
    author_username: String,
    category_title: Option<String>,
    category_slug: Option<String>,
    location_name: Option<String>,
    comment_count: i64,
}

impl From<PreviewRow> for PostPreview {
    fn from(row: PreviewRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            text: row.text,
            image: row.image,
            pub_date: row.pub_date.into(),
            is_published: row.is_published,
            author_username: row.author_username,
            category_title: row.category_title,
            category_slug: row.category_slug,
            location_name: row.location_name,
            comment_count: row.comment_count,
        }
    }
}

/// Anonymous visibility filter: published post, absent-or-published
/// category, `pub_date` elapsed. The SQL twin of
/// `policy::visible_to_public`.
pub(crate) fn public_condition(now: DateTime<Utc>) -> Condition {
    Condition::all()
        .add(post::Column::IsPublished.eq(true))
        .add(post::Column::PubDate.lte(now))
        .add(
            Condition::any()
                .add(post::Column::CategoryId.is_null())
                .add(category::Column::IsPublished.eq(true)),
        )
}

/// Base feed select: posts joined with author, category, location and
/// comments, one row per post with its comment count, newest `pub_date`
/// first.
pub(crate) fn preview_select() -> Select<post::Entity> {
    post::Entity::find()
        .select_only()
        .column(post::Column::Id)
        .column(post::Column::Title)
        .column(post::Column::Text)
        .column(post::Column::Image)
        .column(post::Column::PubDate)
        .column(post::Column::IsPublished)
        .column_as(user::Column::Username, "author_username")
        .column_as(category::Column::Title, "category_title")
        .column_as(category::Column::Slug, "category_slug")
        .column_as(location::Column::Name, "location_name")
        .column_as(comment::Column::Id.count(), "comment_count")
        .join(JoinType::InnerJoin, post::Relation::Author.def())
        .join(JoinType::LeftJoin, post::Relation::Category.def())
        .join(JoinType::LeftJoin, post::Relation::Location.def())
        .join(JoinType::LeftJoin, post::Relation::Comments.def())
        .group_by(post::Column::Id)
        .group_by(user::Column::Username)
        .group_by(category::Column::Title)
        .group_by(category::Column::Slug)
        .group_by(location::Column::Name)
        .order_by_desc(post::Column::PubDate)
}

/// Run a feed select through the paginator, clamping out-of-range page
/// numbers to the last page.
async fn fetch_feed_page(
    db: &DbConn,
    select: Select<post::Entity>,
    page: u64,
) -> Result<Page<PostPreview>, RepoError> {
    let paginator = select.into_model::<PreviewRow>().paginate(db, PAGE_SIZE);
    let totals = paginator.num_items_and_pages().await.map_err(db_err)?;

    let total_pages = Page::<PostPreview>::count_pages(totals.number_of_items, PAGE_SIZE);
    let number = Page::<PostPreview>::clamp_page(page, total_pages);
    let rows = paginator.fetch_page(number - 1).await.map_err(db_err)?;

    Ok(Page {
        items: rows.into_iter().map(Into::into).collect(),
        number,
        total_pages,
        total_items: totals.number_of_items,
    })
}

/// PostgreSQL user repository.
pub struct PostgresUserRepository {
    db: DbConn,
}

impl PostgresUserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let result = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(%username, "Finding user by username");

        let result = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let result = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(Into::into))
    }

    async fn save(&self, entity: User) -> Result<User, RepoError> {
        let active: user::ActiveModel = entity.into();
        let model = user::Entity::insert(active)
            .on_conflict(
                OnConflict::column(user::Column::Id)
                    .update_columns([
                        user::Column::Username,
                        user::Column::FirstName,
                        user::Column::LastName,
                        user::Column::Email,
                        user::Column::PasswordHash,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.into())
    }
}

/// PostgreSQL category repository.
pub struct PostgresCategoryRepository {
    db: DbConn,
}

impl PostgresCategoryRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        let result = category::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = category::Entity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(Into::into))
    }

    async fn save(&self, entity: Category) -> Result<Category, RepoError> {
        let active: category::ActiveModel = entity.into();
        let model = category::Entity::insert(active)
            .on_conflict(
                OnConflict::column(category::Column::Id)
                    .update_columns([
                        category::Column::Title,
                        category::Column::Description,
                        category::Column::Slug,
                        category::Column::IsPublished,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        // The FK cascades take the category's posts (and their comments)
        // with it.
        let result = category::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

/// PostgreSQL location repository.
pub struct PostgresLocationRepository {
    db: DbConn,
}

impl PostgresLocationRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LocationRepository for PostgresLocationRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Location>, RepoError> {
        let result = location::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(Into::into))
    }

    async fn save(&self, entity: Location) -> Result<Location, RepoError> {
        let active: location::ActiveModel = entity.into();
        let model = location::Entity::insert(active)
            .on_conflict(
                OnConflict::column(location::Column::Id)
                    .update_columns([location::Column::Name, location::Column::IsPublished])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        // ON DELETE SET NULL clears the reference on posts.
        let result = location::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let result = post::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_detail(&self, id: Uuid) -> Result<Option<PostDetail>, RepoError> {
        let Some(model) = post::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        let author = model
            .find_related(user::Entity)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(RepoError::NotFound)?;
        let category = model
            .find_related(category::Entity)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        let location = model
            .find_related(location::Entity)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(Some(PostDetail {
            post: model.into(),
            author: author.into(),
            category: category.map(Into::into),
            location: location.map(Into::into),
        }))
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        let active: post::ActiveModel = entity.into();
        let model = post::Entity::insert(active)
            .on_conflict(
                OnConflict::column(post::Column::Id)
                    .update_columns([
                        post::Column::Title,
                        post::Column::Text,
                        post::Column::Image,
                        post::Column::PubDate,
                        post::Column::IsPublished,
                        post::Column::CategoryId,
                        post::Column::LocationId,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = post::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn global_feed(
        &self,
        now: DateTime<Utc>,
        page: u64,
    ) -> Result<Page<PostPreview>, RepoError> {
        let select = preview_select().filter(public_condition(now));
        fetch_feed_page(&self.db, select, page).await
    }

    async fn category_feed(
        &self,
        category_id: Uuid,
        now: DateTime<Utc>,
        page: u64,
    ) -> Result<Page<PostPreview>, RepoError> {
        let select = preview_select()
            .filter(public_condition(now))
            .filter(post::Column::CategoryId.eq(category_id));
        fetch_feed_page(&self.db, select, page).await
    }

    async fn profile_feed(
        &self,
        author_id: Uuid,
        include_hidden: bool,
        now: DateTime<Utc>,
        page: u64,
    ) -> Result<Page<PostPreview>, RepoError> {
        let mut select = preview_select().filter(post::Column::AuthorId.eq(author_id));
        if !include_hidden {
            select = select.filter(public_condition(now));
        }
        fetch_feed_page(&self.db, select, page).await
    }
}

/// PostgreSQL comment repository.
pub struct PostgresCommentRepository {
    db: DbConn,
}

impl PostgresCommentRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let result = comment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentWithAuthor>, RepoError> {
        let rows = comment::Entity::find()
            .find_also_related(user::Entity)
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|(model, author)| CommentWithAuthor {
                comment: model.into(),
                // The author FK is NOT NULL; an absent join row cannot
                // happen outside a torn migration.
                author_username: author.map(|u| u.username).unwrap_or_default(),
            })
            .collect())
    }

    async fn save(&self, entity: Comment) -> Result<Comment, RepoError> {
        let active: comment::ActiveModel = entity.into();
        let model = comment::Entity::insert(active)
            .on_conflict(
                OnConflict::column(comment::Column::Id)
                    .update_columns([comment::Column::Text])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = comment::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
