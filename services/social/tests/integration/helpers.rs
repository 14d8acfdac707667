//! PostgreSQL fixtures. The suite is ignored by default; run it with
//! `TEST_DATABASE_URL=... cargo test -- --ignored`.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectionTrait, Database, DatabaseConnection, Statement,
};
use sea_orm_migration::MigratorTrait;
use tokio::sync::{Mutex, MutexGuard, OnceCell};

use bookmarkd_domain::rating::ReadingStatus;
use bookmarkd_social::domain::repository::RatingRepository;
use bookmarkd_social::domain::types::{Rating, RatingUpsert};
use bookmarkd_social::infra::cache::RedisResponseCache;
use bookmarkd_social::infra::db::DbRatingRepository;
use bookmarkd_social_migration::Migrator;
use bookmarkd_social_schema::{book_genres, books, genres, users};

static MIGRATED: OnceCell<()> = OnceCell::const_new();
// Every test truncates the shared database, so they run one at a time.
static SERIAL: Mutex<()> = Mutex::const_new(());

pub struct TestDb {
    pub db: DatabaseConnection,
    _guard: MutexGuard<'static, ()>,
}

/// Connect, migrate once per run, and start from empty tables.
pub async fn setup() -> TestDb {
    let url = std::env::var("TEST_DATABASE_URL")
        .expect("TEST_DATABASE_URL must point at a disposable PostgreSQL database");
    let guard = SERIAL.lock().await;
    let db = Database::connect(&url).await.unwrap();

    MIGRATED
        .get_or_init(|| async {
            Migrator::up(&db, None).await.unwrap();
        })
        .await;

    db.execute_unprepared(
        "TRUNCATE comments, review_likes, follows, ratings, book_genres, genres, books, users \
         RESTART IDENTITY CASCADE",
    )
    .await
    .unwrap();

    TestDb { db, _guard: guard }
}

/// Cache that never stores anything.
pub fn no_cache() -> RedisResponseCache {
    RedisResponseCache { pool: None }
}

pub fn rating_repo(db: &DatabaseConnection) -> DbRatingRepository {
    DbRatingRepository { db: db.clone() }
}

pub async fn create_user(db: &DatabaseConnection, username: &str) -> i32 {
    users::ActiveModel {
        email: Set(format!("{username}@example.com")),
        username: Set(username.to_owned()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

pub async fn create_book(db: &DatabaseConnection, title: &str, author: &str) -> i32 {
    books::ActiveModel {
        title: Set(title.to_owned()),
        author: Set(author.to_owned()),
        cover_url: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

pub async fn create_genre(db: &DatabaseConnection, name: &str) -> i32 {
    genres::ActiveModel {
        name: Set(name.to_owned()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

pub async fn tag_book(db: &DatabaseConnection, book_id: i32, genre_id: i32) {
    book_genres::ActiveModel {
        book_id: Set(book_id),
        genre_id: Set(genre_id),
    }
    .insert(db)
    .await
    .unwrap();
}

/// Finished-reading rating with the given score.
pub async fn rate(db: &DatabaseConnection, user_id: i32, book_id: i32, score: i32) -> Rating {
    rating_repo(db)
        .upsert(&RatingUpsert {
            user_id,
            book_id,
            rating: score,
            review: None,
            status: ReadingStatus::FinishedReading,
        })
        .await
        .unwrap()
}

/// Move a rating's `created_at` to a fixed instant.
pub async fn backdate(db: &DatabaseConnection, rating_id: i32, at: DateTime<Utc>) {
    db.execute(Statement::from_sql_and_values(
        db.get_database_backend(),
        "UPDATE ratings SET created_at = $1 WHERE id = $2",
        [at.into(), rating_id.into()],
    ))
    .await
    .unwrap();
}
