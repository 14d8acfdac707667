use chrono::{TimeZone, Utc};

use bookmarkd_domain::rating::ReadingStatus;
use bookmarkd_social::domain::repository::RatingRepository;
use bookmarkd_social::domain::types::RatingUpsert;
use bookmarkd_social::infra::db::DbStatsRepository;
use bookmarkd_social::usecase::stats::GetYearStatsUseCase;

use crate::helpers::{
    backdate, create_book, create_genre, create_user, rate, rating_repo, setup, tag_book,
};

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn should_aggregate_year_stats() {
    let t = setup().await;
    let user = create_user(&t.db, "ada").await;
    let sf = create_genre(&t.db, "Science Fiction").await;
    let fantasy = create_genre(&t.db, "Fantasy").await;

    let days = [
        (2024, 3, 1, 8, "Herbert"),
        (2024, 3, 2, 6, "Herbert"),
        (2024, 3, 3, 10, "Le Guin"),
        (2024, 3, 10, 4, "Herbert"),
        (2024, 7, 15, 7, "Banks"),
        (2023, 12, 31, 9, "Banks"),
    ];
    for (i, (year, month, day, score, author)) in days.into_iter().enumerate() {
        let book = create_book(&t.db, &format!("Book {i}"), author).await;
        tag_book(&t.db, book, if i < 3 { sf } else { fantasy }).await;
        let rating = rate(&t.db, user, book, score).await;
        let at = Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap();
        backdate(&t.db, rating.id, at).await;
    }

    // Unrated shelf entries never count.
    let shelved = create_book(&t.db, "Someday", "Tolkien").await;
    rating_repo(&t.db)
        .upsert(&RatingUpsert {
            user_id: user,
            book_id: shelved,
            rating: 0,
            review: None,
            status: ReadingStatus::ToRead,
        })
        .await
        .unwrap();

    let uc = GetYearStatsUseCase {
        repo: DbStatsRepository { db: t.db.clone() },
    };
    let stats = uc.execute(user, 2024).await.unwrap();

    assert_eq!(stats.year, 2024);
    assert_eq!(stats.books_read, 5);
    assert_eq!(stats.average_rating, 7.0);
    assert_eq!(stats.longest_streak, 3);

    assert_eq!(stats.top_genres[0].genre, "Science Fiction");
    assert_eq!(stats.top_genres[0].count, 3);
    assert_eq!(stats.top_genres[1].genre, "Fantasy");
    assert_eq!(stats.top_genres[1].count, 2);

    assert_eq!(stats.favorite_authors[0].author, "Herbert");
    assert_eq!(stats.favorite_authors[0].count, 3);

    let months: Vec<(u32, i64)> = stats.monthly.iter().map(|m| (m.month, m.count)).collect();
    assert_eq!(months, vec![(3, 4), (7, 1)]);
    let dense = stats.dense_monthly();
    assert_eq!(dense[2], 4);
    assert_eq!(dense[6], 1);
    assert_eq!(dense.iter().sum::<i64>(), 5);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn should_return_empty_stats_for_quiet_year() {
    let t = setup().await;
    let user = create_user(&t.db, "ada").await;
    let book = create_book(&t.db, "Dune", "Frank Herbert").await;
    let rating = rate(&t.db, user, book, 9).await;
    let at = Utc.with_ymd_and_hms(2024, 5, 5, 12, 0, 0).unwrap();
    backdate(&t.db, rating.id, at).await;

    let uc = GetYearStatsUseCase {
        repo: DbStatsRepository { db: t.db.clone() },
    };
    let stats = uc.execute(user, 2019).await.unwrap();

    assert_eq!(stats.books_read, 0);
    assert_eq!(stats.average_rating, 0.0);
    assert_eq!(stats.longest_streak, 0);
    assert!(stats.top_genres.is_empty());
    assert!(stats.monthly.is_empty());
}
