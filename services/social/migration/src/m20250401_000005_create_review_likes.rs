use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReviewLikes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ReviewLikes::UserId).integer().not_null())
                    .col(ColumnDef::new(ReviewLikes::RatingId).integer().not_null())
                    .col(
                        ColumnDef::new(ReviewLikes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(ReviewLikes::UserId)
                            .col(ReviewLikes::RatingId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ReviewLikes::Table, ReviewLikes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ReviewLikes::Table, ReviewLikes::RatingId)
                            .to(Ratings::Table, Ratings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReviewLikes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ReviewLikes {
    Table,
    UserId,
    RatingId,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Ratings {
    Table,
    Id,
}
