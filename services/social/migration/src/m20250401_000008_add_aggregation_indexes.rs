use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .table(Ratings::Table)
                    .col(Ratings::BookId)
                    .name("idx_ratings_book_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Ratings::Table)
                    .col(Ratings::CreatedAt)
                    .name("idx_ratings_created_at")
                    .to_owned(),
            )
            .await?;
        // Year stats and top-rated scan one user's ratings by time.
        manager
            .create_index(
                Index::create()
                    .table(Ratings::Table)
                    .col(Ratings::UserId)
                    .col(Ratings::CreatedAt)
                    .name("idx_ratings_user_id_created_at")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Comments::Table)
                    .col(Comments::RatingId)
                    .name("idx_comments_rating_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Follows::Table)
                    .col(Follows::FollowingId)
                    .name("idx_follows_following_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_follows_following_id",
            "idx_comments_rating_id",
            "idx_ratings_user_id_created_at",
            "idx_ratings_created_at",
            "idx_ratings_book_id",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(Iden)]
enum Ratings {
    Table,
    BookId,
    UserId,
    CreatedAt,
}

#[derive(Iden)]
enum Comments {
    Table,
    RatingId,
}

#[derive(Iden)]
enum Follows {
    Table,
    FollowingId,
}
