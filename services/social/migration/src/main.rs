use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    cli::run_cli(bookmarkd_social_migration::Migrator).await;
}
