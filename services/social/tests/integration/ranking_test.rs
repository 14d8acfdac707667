use chrono::{Duration, Utc};

use bookmarkd_social::infra::db::DbRankingRepository;
use bookmarkd_social::usecase::ranking::{
    GetPopularUseCase, GetSimilarBooksUseCase, GetTrendingUseCase,
};

use crate::helpers::{backdate, create_book, create_user, rate, setup};

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn should_count_only_ratings_inside_trending_window() {
    let t = setup().await;
    let book = create_book(&t.db, "Dune", "Frank Herbert").await;
    let mut scores = Vec::new();
    for (name, score) in [("a", 8), ("b", 6), ("c", 10)] {
        let user = create_user(&t.db, name).await;
        scores.push(rate(&t.db, user, book, score).await);
    }
    backdate(&t.db, scores[2].id, Utc::now() - Duration::days(30)).await;

    let uc = GetTrendingUseCase {
        repo: DbRankingRepository { db: t.db.clone() },
    };
    let trending = uc.execute(Some(7), None).await.unwrap();

    assert_eq!(trending.len(), 1);
    assert_eq!(trending[0].book.id, book);
    assert_eq!(trending[0].rating_count, 2);
    assert_eq!(trending[0].average_rating, 7.0);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn should_rank_trending_by_count_then_average() {
    let t = setup().await;
    let busy = create_book(&t.db, "Busy", "A").await;
    let quiet = create_book(&t.db, "Quiet", "B").await;
    let u1 = create_user(&t.db, "u1").await;
    let u2 = create_user(&t.db, "u2").await;
    rate(&t.db, u1, busy, 5).await;
    rate(&t.db, u2, busy, 5).await;
    rate(&t.db, u1, quiet, 10).await;

    let uc = GetTrendingUseCase {
        repo: DbRankingRepository { db: t.db.clone() },
    };
    let trending = uc.execute(None, None).await.unwrap();
    let ids: Vec<i32> = trending.iter().map(|b| b.book.id).collect();
    assert_eq!(ids, vec![busy, quiet]);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn should_exclude_books_below_popular_threshold() {
    let t = setup().await;
    let qualifying = create_book(&t.db, "Five", "A").await;
    let sparse = create_book(&t.db, "Three", "B").await;
    for i in 0..5 {
        let user = create_user(&t.db, &format!("reader{i}")).await;
        rate(&t.db, user, qualifying, 6).await;
        if i < 3 {
            rate(&t.db, user, sparse, 10).await;
        }
    }

    let uc = GetPopularUseCase {
        repo: DbRankingRepository { db: t.db.clone() },
    };
    let popular = uc.execute(Some(5), None).await.unwrap();

    assert_eq!(popular.len(), 1);
    assert_eq!(popular[0].book.id, qualifying);
    assert_eq!(popular[0].rating_count, 5);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn should_require_two_co_raters_for_similar_books() {
    let t = setup().await;
    let reference = create_book(&t.db, "Reference", "A").await;
    let shared = create_book(&t.db, "Shared", "B").await;
    let lonely = create_book(&t.db, "Lonely", "C").await;
    let u1 = create_user(&t.db, "u1").await;
    let u2 = create_user(&t.db, "u2").await;
    let u3 = create_user(&t.db, "u3").await;

    // u1 and u2 liked both; only u3 liked the lonely book.
    rate(&t.db, u1, reference, 7).await;
    rate(&t.db, u2, reference, 9).await;
    rate(&t.db, u3, reference, 10).await;
    rate(&t.db, u1, shared, 8).await;
    rate(&t.db, u2, shared, 10).await;
    rate(&t.db, u3, lonely, 9).await;
    // A low score never counts as a co-rating.
    rate(&t.db, u1, lonely, 3).await;

    let uc = GetSimilarBooksUseCase {
        repo: DbRankingRepository { db: t.db.clone() },
    };
    let similar = uc.execute(reference, None).await.unwrap();

    assert_eq!(similar.len(), 1);
    assert_eq!(similar[0].book.id, shared);
    assert_eq!(similar[0].common_users, 2);
    assert_eq!(similar[0].average_rating, 9.0);
    assert!(similar.iter().all(|b| b.book.id != reference));
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn should_return_no_similar_books_without_co_raters() {
    let t = setup().await;
    let reference = create_book(&t.db, "Reference", "A").await;
    let user = create_user(&t.db, "solo").await;
    rate(&t.db, user, reference, 9).await;

    let uc = GetSimilarBooksUseCase {
        repo: DbRankingRepository { db: t.db.clone() },
    };
    assert!(uc.execute(reference, None).await.unwrap().is_empty());
}
