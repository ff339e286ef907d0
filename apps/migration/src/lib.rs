pub use sea_orm_migration::prelude::*;

mod m20260830_000001_create_users;
mod m20260830_000002_create_categories;
mod m20260830_000003_create_locations;
mod m20260830_000004_create_posts;
mod m20260830_000005_create_comments;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260830_000001_create_users::Migration),
            Box::new(m20260830_000002_create_categories::Migration),
            Box::new(m20260830_000003_create_locations::Migration),
            Box::new(m20260830_000004_create_posts::Migration),
            Box::new(m20260830_000005_create_comments::Migration),
        ]
    }
}
