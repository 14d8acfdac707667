use bookmarkd_social::error::SocialServiceError;
use bookmarkd_social::infra::db::DbFollowRepository;
use bookmarkd_social::usecase::follow::{
    FollowUserUseCase, GetFollowStatsUseCase, ListFollowersUseCase, ListFollowingUseCase,
    UnfollowUserUseCase,
};

use crate::helpers::{create_user, no_cache, setup};

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn should_follow_and_report_counts() {
    let t = setup().await;
    let ada = create_user(&t.db, "ada").await;
    let bob = create_user(&t.db, "bob").await;
    let cy = create_user(&t.db, "cy").await;

    let follow = FollowUserUseCase {
        follows: DbFollowRepository { db: t.db.clone() },
        cache: no_cache(),
    };
    follow.execute(ada, bob).await.unwrap();
    follow.execute(cy, bob).await.unwrap();
    follow.execute(bob, ada).await.unwrap();

    let stats = GetFollowStatsUseCase {
        follows: DbFollowRepository { db: t.db.clone() },
    };
    let bob_stats = stats.execute(bob, Some(ada)).await.unwrap();
    assert_eq!(bob_stats.followers, 2);
    assert_eq!(bob_stats.following, 1);
    assert!(bob_stats.is_following);

    let anonymous = stats.execute(bob, None).await.unwrap();
    assert!(!anonymous.is_following);

    let followers = ListFollowersUseCase {
        follows: DbFollowRepository { db: t.db.clone() },
    }
    .execute(bob)
    .await
    .unwrap();
    let mut names: Vec<String> = followers.into_iter().map(|u| u.username).collect();
    names.sort();
    assert_eq!(names, vec!["ada", "cy"]);

    let following = ListFollowingUseCase {
        follows: DbFollowRepository { db: t.db.clone() },
    }
    .execute(bob)
    .await
    .unwrap();
    assert_eq!(following.len(), 1);
    assert_eq!(following[0].id, ada);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn should_reject_duplicate_follow() {
    let t = setup().await;
    let ada = create_user(&t.db, "ada").await;
    let bob = create_user(&t.db, "bob").await;

    let follow = FollowUserUseCase {
        follows: DbFollowRepository { db: t.db.clone() },
        cache: no_cache(),
    };
    follow.execute(ada, bob).await.unwrap();
    let result = follow.execute(ada, bob).await;

    assert!(
        matches!(result, Err(SocialServiceError::AlreadyFollowing)),
        "expected AlreadyFollowing, got {result:?}"
    );
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn should_return_follow_not_found_when_unfollowing_stranger() {
    let t = setup().await;
    let ada = create_user(&t.db, "ada").await;
    let bob = create_user(&t.db, "bob").await;

    let unfollow = UnfollowUserUseCase {
        follows: DbFollowRepository { db: t.db.clone() },
        cache: no_cache(),
    };
    let result = unfollow.execute(ada, bob).await;

    assert!(
        matches!(result, Err(SocialServiceError::FollowNotFound)),
        "expected FollowNotFound, got {result:?}"
    );
}
