use sea_orm_migration::prelude::*;

mod m20250401_000001_create_users;
mod m20250401_000002_create_books;
mod m20250401_000003_create_genres;
mod m20250401_000004_create_ratings;
mod m20250401_000005_create_review_likes;
mod m20250401_000006_create_comments;
mod m20250401_000007_create_follows;
mod m20250401_000008_add_aggregation_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250401_000001_create_users::Migration),
            Box::new(m20250401_000002_create_books::Migration),
            Box::new(m20250401_000003_create_genres::Migration),
            Box::new(m20250401_000004_create_ratings::Migration),
            Box::new(m20250401_000005_create_review_likes::Migration),
            Box::new(m20250401_000006_create_comments::Migration),
            Box::new(m20250401_000007_create_follows::Migration),
            Box::new(m20250401_000008_add_aggregation_indexes::Migration),
        ]
    }
}
