//! Domain entities - the core business objects.

mod category;
mod comment;
mod location;
mod post;
mod user;

pub use category::Category;
pub use comment::{Comment, CommentWithAuthor};
pub use location::Location;
pub use post::{Post, PostDetail, PostPreview};
pub use user::User;
