use chrono::{Duration, Utc};

use bookmarkd_domain::rating::ReadingStatus;
use bookmarkd_social::domain::repository::RatingRepository;
use bookmarkd_social::domain::types::{RatingPatch, RatingSortBy};
use bookmarkd_social::error::SocialServiceError;
use bookmarkd_social::usecase::rating::{
    GetBookRatingsUseCase, LikeRatingUseCase, ListMyRatingsUseCase, UnlikeRatingUseCase,
    UpdateRatingInput, UpdateRatingUseCase, UpsertRatingInput, UpsertRatingUseCase,
};

use crate::helpers::{backdate, create_book, create_user, no_cache, rate, rating_repo, setup};

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn should_keep_a_single_row_per_user_and_book() {
    let t = setup().await;
    let user = create_user(&t.db, "ada").await;
    let book = create_book(&t.db, "Dune", "Frank Herbert").await;

    let uc = UpsertRatingUseCase {
        repo: rating_repo(&t.db),
        cache: no_cache(),
    };
    let first = uc
        .execute(
            user,
            UpsertRatingInput {
                book_id: book,
                rating: Some(6),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let second = uc
        .execute(
            user,
            UpsertRatingInput {
                book_id: book,
                rating: Some(9),
                review: Some("Better on reread".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.rating, 9);
    assert_eq!(second.review.as_deref(), Some("Better on reread"));

    let stats = rating_repo(&t.db)
        .find_by_book(book, None, RatingSortBy::Newest)
        .await
        .unwrap();
    assert_eq!(stats.total_ratings, 1);
    assert_eq!(stats.average_rating, 9.0);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn should_allow_unrated_entry_for_to_read_status() {
    let t = setup().await;
    let user = create_user(&t.db, "ada").await;
    let book = create_book(&t.db, "Dune", "Frank Herbert").await;

    let uc = UpsertRatingUseCase {
        repo: rating_repo(&t.db),
        cache: no_cache(),
    };
    let rating = uc
        .execute(
            user,
            UpsertRatingInput {
                book_id: book,
                status: Some(ReadingStatus::ToRead),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(rating.rating, 0);
    assert_eq!(rating.status, ReadingStatus::ToRead);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn should_report_zero_average_for_unrated_book() {
    let t = setup().await;
    let book = create_book(&t.db, "Unread", "Nobody").await;

    let uc = GetBookRatingsUseCase {
        repo: rating_repo(&t.db),
    };
    let stats = uc.execute(book, None, RatingSortBy::Newest).await.unwrap();

    assert_eq!(stats.average_rating, 0.0);
    assert_eq!(stats.total_ratings, 0);
    assert!(stats.ratings.is_empty());
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn should_count_likes_once_and_flag_viewer() {
    let t = setup().await;
    let author = create_user(&t.db, "author").await;
    let fan = create_user(&t.db, "fan").await;
    let book = create_book(&t.db, "Dune", "Frank Herbert").await;
    let rating = rate(&t.db, author, book, 8).await;

    let like = LikeRatingUseCase {
        repo: rating_repo(&t.db),
        cache: no_cache(),
    };
    like.execute(fan, rating.id).await.unwrap();
    like.execute(fan, rating.id).await.unwrap();

    let stats = rating_repo(&t.db)
        .find_by_book(book, Some(fan), RatingSortBy::MostLiked)
        .await
        .unwrap();
    assert_eq!(stats.ratings[0].like_count, 1);
    assert!(stats.ratings[0].liked_by_viewer);

    let anonymous = rating_repo(&t.db)
        .find_by_book(book, None, RatingSortBy::MostLiked)
        .await
        .unwrap();
    assert!(!anonymous.ratings[0].liked_by_viewer);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn should_return_like_not_found_when_unliking_twice() {
    let t = setup().await;
    let author = create_user(&t.db, "author").await;
    let fan = create_user(&t.db, "fan").await;
    let book = create_book(&t.db, "Dune", "Frank Herbert").await;
    let rating = rate(&t.db, author, book, 8).await;

    rating_repo(&t.db).like(fan, rating.id).await.unwrap();
    let unlike = UnlikeRatingUseCase {
        repo: rating_repo(&t.db),
        cache: no_cache(),
    };
    unlike.execute(fan, rating.id).await.unwrap();
    let result = unlike.execute(fan, rating.id).await;

    assert!(
        matches!(result, Err(SocialServiceError::LikeNotFound)),
        "expected LikeNotFound, got {result:?}"
    );
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn should_sort_by_highest_rating() {
    let t = setup().await;
    let book = create_book(&t.db, "Dune", "Frank Herbert").await;
    for (name, score) in [("a", 4), ("b", 10), ("c", 7)] {
        let user = create_user(&t.db, name).await;
        rate(&t.db, user, book, score).await;
    }

    let stats = rating_repo(&t.db)
        .find_by_book(book, None, RatingSortBy::HighestRating)
        .await
        .unwrap();
    let scores: Vec<i32> = stats.ratings.iter().map(|r| r.rating.rating).collect();
    assert_eq!(scores, vec![10, 7, 4]);
    assert_eq!(stats.average_rating, 7.0);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn should_remove_likes_and_comments_with_deleted_rating() {
    let t = setup().await;
    let author = create_user(&t.db, "author").await;
    let fan = create_user(&t.db, "fan").await;
    let book = create_book(&t.db, "Dune", "Frank Herbert").await;
    let rating = rate(&t.db, author, book, 8).await;
    let repo = rating_repo(&t.db);
    repo.like(fan, rating.id).await.unwrap();

    assert!(repo.delete(author, book).await.unwrap());
    assert!(!repo.delete(author, book).await.unwrap());
    assert!(!repo.unlike(fan, rating.id).await.unwrap());
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn should_list_top_rated_highest_first_with_snippet() {
    let t = setup().await;
    let user = create_user(&t.db, "ada").await;
    let low = create_book(&t.db, "Meh", "X").await;
    let high = create_book(&t.db, "Wow", "Y").await;
    rate(&t.db, user, low, 5).await;
    let long_review = "a".repeat(200);
    rating_repo(&t.db)
        .upsert(&bookmarkd_social::domain::types::RatingUpsert {
            user_id: user,
            book_id: high,
            rating: 10,
            review: Some(long_review),
            status: ReadingStatus::FinishedReading,
        })
        .await
        .unwrap();

    let top = rating_repo(&t.db).top_rated_by_user(user, 5).await.unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].book.id, high);
    let snippet = top[0].review_snippet.as_deref().unwrap();
    assert!(snippet.ends_with("..."));
    assert_eq!(snippet.chars().count(), 153);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn should_average_and_order_by_likes_then_recency() {
    let t = setup().await;
    let book = create_book(&t.db, "Dune", "Frank Herbert").await;
    let now = Utc::now();
    let mut ids = Vec::new();
    // 4 is the middle one by age, 7 the newest, 10 the oldest.
    for (name, score, age_days) in [("a", 4, 2), ("b", 7, 1), ("c", 10, 3)] {
        let user = create_user(&t.db, name).await;
        let rating = rate(&t.db, user, book, score).await;
        backdate(&t.db, rating.id, now - Duration::days(age_days)).await;
        ids.push(rating.id);
    }
    let fan1 = create_user(&t.db, "fan1").await;
    let fan2 = create_user(&t.db, "fan2").await;
    let repo = rating_repo(&t.db);
    repo.like(fan1, ids[0]).await.unwrap();
    repo.like(fan2, ids[0]).await.unwrap();
    repo.like(fan1, ids[1]).await.unwrap();

    let uc = GetBookRatingsUseCase {
        repo: rating_repo(&t.db),
    };
    let liked = uc.execute(book, None, RatingSortBy::MostLiked).await.unwrap();
    assert_eq!(liked.average_rating, 7.0);
    assert_eq!(liked.total_ratings, 3);
    let order: Vec<(i32, i64)> = liked
        .ratings
        .iter()
        .map(|r| (r.rating.rating, r.like_count))
        .collect();
    assert_eq!(order, vec![(4, 2), (7, 1), (10, 0)]);

    let newest = uc.execute(book, None, RatingSortBy::Newest).await.unwrap();
    let scores: Vec<i32> = newest.ratings.iter().map(|r| r.rating.rating).collect();
    assert_eq!(scores, vec![7, 4, 10]);
    assert!(
        newest
            .ratings
            .windows(2)
            .all(|w| w[0].rating.created_at >= w[1].rating.created_at)
    );
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn should_break_like_ties_by_newest() {
    let t = setup().await;
    let book = create_book(&t.db, "Dune", "Frank Herbert").await;
    let fan = create_user(&t.db, "fan").await;
    let now = Utc::now();
    for (name, score, age_days) in [("old", 9, 5), ("new", 3, 1)] {
        let user = create_user(&t.db, name).await;
        let rating = rate(&t.db, user, book, score).await;
        backdate(&t.db, rating.id, now - Duration::days(age_days)).await;
        rating_repo(&t.db).like(fan, rating.id).await.unwrap();
    }

    let stats = rating_repo(&t.db)
        .find_by_book(book, None, RatingSortBy::MostLiked)
        .await
        .unwrap();
    let scores: Vec<i32> = stats.ratings.iter().map(|r| r.rating.rating).collect();
    assert_eq!(scores, vec![3, 9]);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn should_list_own_ratings_by_creation_after_edit() {
    let t = setup().await;
    let user = create_user(&t.db, "ada").await;
    let older_book = create_book(&t.db, "Dune", "Frank Herbert").await;
    let newer_book = create_book(&t.db, "Emma", "Jane Austen").await;
    let older = rate(&t.db, user, older_book, 6).await;
    let newer = rate(&t.db, user, newer_book, 8).await;
    let now = Utc::now();
    backdate(&t.db, older.id, now - Duration::days(10)).await;
    backdate(&t.db, newer.id, now - Duration::days(1)).await;

    let edited = UpdateRatingUseCase {
        repo: rating_repo(&t.db),
        cache: no_cache(),
    }
    .execute(
        user,
        older.id,
        UpdateRatingInput {
            review: Some("Held up".to_owned()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(edited.rating, 6);
    assert!(edited.updated_at > newer.updated_at);

    let listed = ListMyRatingsUseCase {
        repo: rating_repo(&t.db),
    }
    .execute(user, None)
    .await
    .unwrap();
    let ids: Vec<i32> = listed.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn should_write_only_patched_columns() {
    let t = setup().await;
    let user = create_user(&t.db, "ada").await;
    let other = create_user(&t.db, "bob").await;
    let book = create_book(&t.db, "Dune", "Frank Herbert").await;
    let rating = rate(&t.db, user, book, 6).await;
    let repo = rating_repo(&t.db);
    repo.update(
        rating.id,
        user,
        &RatingPatch {
            review: Some(Some("Written elsewhere".to_owned())),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let updated = repo
        .update(
            rating.id,
            user,
            &RatingPatch {
                rating: Some(9),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.rating, 9);
    assert_eq!(updated.review.as_deref(), Some("Written elsewhere"));

    let foreign = repo
        .update(
            rating.id,
            other,
            &RatingPatch {
                rating: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(foreign.is_none());
}
