use std::collections::HashSet;

use chrono::{Duration, Utc};

use bookmarkd_domain::pagination::OffsetPage;
use bookmarkd_social::domain::repository::FollowRepository;
use bookmarkd_social::domain::types::FeedType;
use bookmarkd_social::infra::db::{DbFeedRepository, DbFollowRepository};
use bookmarkd_social::usecase::feed::GetFeedUseCase;

use crate::helpers::{backdate, create_book, create_user, rate, setup};

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn should_partition_feed_across_pages() {
    let t = setup().await;
    let book = create_book(&t.db, "Dune", "Frank Herbert").await;
    let now = Utc::now();
    for i in 0..5 {
        let user = create_user(&t.db, &format!("reader{i}")).await;
        let rating = rate(&t.db, user, book, 5 + i).await;
        backdate(&t.db, rating.id, now - Duration::hours(i64::from(i))).await;
    }

    let uc = GetFeedUseCase {
        repo: DbFeedRepository { db: t.db.clone() },
    };
    let first = uc
        .execute(None, FeedType::All, OffsetPage { limit: 2, offset: 0 })
        .await
        .unwrap();
    let second = uc
        .execute(None, FeedType::All, OffsetPage { limit: 2, offset: 2 })
        .await
        .unwrap();
    let third = uc
        .execute(None, FeedType::All, OffsetPage { limit: 2, offset: 4 })
        .await
        .unwrap();

    assert_eq!((first.len(), second.len(), third.len()), (2, 2, 1));
    let ids: Vec<i32> = first
        .iter()
        .chain(&second)
        .chain(&third)
        .map(|item| item.rating.id)
        .collect();
    let unique: HashSet<i32> = ids.iter().copied().collect();
    assert_eq!(unique.len(), 5);

    let times: Vec<_> = first
        .iter()
        .chain(&second)
        .chain(&third)
        .map(|item| item.rating.created_at)
        .collect();
    assert!(times.windows(2).all(|w| w[0] >= w[1]), "feed must be newest first");
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn should_restrict_following_feed_to_followed_users() {
    let t = setup().await;
    let viewer = create_user(&t.db, "viewer").await;
    let friend = create_user(&t.db, "friend").await;
    let stranger = create_user(&t.db, "stranger").await;
    let book = create_book(&t.db, "Dune", "Frank Herbert").await;
    let friend_rating = rate(&t.db, friend, book, 9).await;
    rate(&t.db, stranger, book, 4).await;
    DbFollowRepository { db: t.db.clone() }
        .follow(viewer, friend)
        .await
        .unwrap();

    let uc = GetFeedUseCase {
        repo: DbFeedRepository { db: t.db.clone() },
    };
    let following = uc
        .execute(Some(viewer), FeedType::Following, OffsetPage::default())
        .await
        .unwrap();
    assert_eq!(following.len(), 1);
    assert_eq!(following[0].rating.id, friend_rating.id);
    assert_eq!(following[0].username, "friend");
    assert_eq!(following[0].book.title, "Dune");

    let global = uc
        .execute(Some(viewer), FeedType::All, OffsetPage::default())
        .await
        .unwrap();
    assert_eq!(global.len(), 2);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn should_serve_global_feed_for_anonymous_following_request() {
    let t = setup().await;
    let user = create_user(&t.db, "ada").await;
    let book = create_book(&t.db, "Dune", "Frank Herbert").await;
    rate(&t.db, user, book, 9).await;

    let uc = GetFeedUseCase {
        repo: DbFeedRepository { db: t.db.clone() },
    };
    let items = uc
        .execute(None, FeedType::Following, OffsetPage::default())
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
}
