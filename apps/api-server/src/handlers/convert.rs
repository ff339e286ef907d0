//! Domain-to-DTO conversions shared by the handlers.

use chronicle_core::Page;
use chronicle_core::domain::{Category, CommentWithAuthor, PostDetail, PostPreview, User};
use chronicle_shared::dto::{
    CategoryResponse, CommentResponse, PageMeta, PostDetailResponse, PostPreviewResponse,
    ProfileResponse,
};

pub(crate) fn page_meta<T>(page: &Page<T>) -> PageMeta {
    PageMeta {
        number: page.number,
        total_pages: page.total_pages,
        total_items: page.total_items,
        has_next: page.has_next(),
        has_previous: page.has_previous(),
    }
}

pub(crate) fn preview_response(preview: PostPreview) -> PostPreviewResponse {
    PostPreviewResponse {
        id: preview.id,
        title: preview.title,
        text: preview.text,
        image: preview.image,
        pub_date: preview.pub_date,
        is_published: preview.is_published,
        author_username: preview.author_username,
        category_title: preview.category_title,
        category_slug: preview.category_slug,
        location_name: preview.location_name,
        comment_count: preview.comment_count,
    }
}

pub(crate) fn feed_items(page: Page<PostPreview>) -> (Vec<PostPreviewResponse>, PageMeta) {
    let meta = page_meta(&page);
    (page.items.into_iter().map(preview_response).collect(), meta)
}

pub(crate) fn category_response(category: &Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        title: category.title.clone(),
        description: category.description.clone(),
        slug: category.slug.clone(),
    }
}

pub(crate) fn profile_response(user: &User) -> ProfileResponse {
    ProfileResponse {
        id: user.id,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        email: user.email.clone(),
        created_at: user.created_at,
    }
}

pub(crate) fn comment_response(entry: CommentWithAuthor) -> CommentResponse {
    CommentResponse {
        id: entry.comment.id,
        post_id: entry.comment.post_id,
        author_id: entry.comment.author_id,
        author_username: entry.author_username,
        text: entry.comment.text,
        created_at: entry.comment.created_at,
    }
}

pub(crate) fn detail_response(
    detail: PostDetail,
    comments: Vec<CommentWithAuthor>,
) -> PostDetailResponse {
    PostDetailResponse {
        id: detail.post.id,
        title: detail.post.title,
        text: detail.post.text,
        image: detail.post.image,
        pub_date: detail.post.pub_date,
        is_published: detail.post.is_published,
        created_at: detail.post.created_at,
        author_id: detail.author.id,
        author_username: detail.author.username,
        category: detail.category.as_ref().map(category_response),
        location_name: detail.location.map(|l| l.name),
        comments: comments.into_iter().map(comment_response).collect(),
    }
}
