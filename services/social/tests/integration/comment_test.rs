use bookmarkd_social::domain::repository::RatingRepository;
use bookmarkd_social::domain::types::RatingSortBy;
use bookmarkd_social::error::SocialServiceError;
use bookmarkd_social::infra::db::DbCommentRepository;
use bookmarkd_social::usecase::comment::{
    CreateCommentUseCase, DeleteCommentUseCase, ListCommentsUseCase,
};

use crate::helpers::{create_book, create_user, no_cache, rate, rating_repo, setup};

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn should_create_list_and_count_comments() {
    let t = setup().await;
    let author = create_user(&t.db, "author").await;
    let reader = create_user(&t.db, "reader").await;
    let book = create_book(&t.db, "Dune", "Frank Herbert").await;
    let rating = rate(&t.db, author, book, 9).await;

    let create = CreateCommentUseCase {
        comments: DbCommentRepository { db: t.db.clone() },
        ratings: rating_repo(&t.db),
        cache: no_cache(),
    };
    let first = create
        .execute(reader, rating.id, "  Loved the worms  ")
        .await
        .unwrap();
    create.execute(author, rating.id, "Thanks!").await.unwrap();
    assert_eq!(first.text, "Loved the worms");

    let list = ListCommentsUseCase {
        comments: DbCommentRepository { db: t.db.clone() },
    };
    let comments = list.execute(rating.id).await.unwrap();
    let usernames: Vec<&str> = comments.iter().map(|c| c.username.as_str()).collect();
    assert_eq!(usernames, vec!["reader", "author"]);

    let stats = rating_repo(&t.db)
        .find_by_book(book, None, RatingSortBy::Newest)
        .await
        .unwrap();
    assert_eq!(stats.ratings[0].comment_count, 2);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn should_reject_comment_on_missing_rating() {
    let t = setup().await;
    let reader = create_user(&t.db, "reader").await;

    let create = CreateCommentUseCase {
        comments: DbCommentRepository { db: t.db.clone() },
        ratings: rating_repo(&t.db),
        cache: no_cache(),
    };
    let result = create.execute(reader, 9999, "Hello").await;

    assert!(
        matches!(result, Err(SocialServiceError::RatingNotFound)),
        "expected RatingNotFound, got {result:?}"
    );
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn should_only_delete_own_comment() {
    let t = setup().await;
    let author = create_user(&t.db, "author").await;
    let reader = create_user(&t.db, "reader").await;
    let book = create_book(&t.db, "Dune", "Frank Herbert").await;
    let rating = rate(&t.db, author, book, 9).await;

    let create = CreateCommentUseCase {
        comments: DbCommentRepository { db: t.db.clone() },
        ratings: rating_repo(&t.db),
        cache: no_cache(),
    };
    let comment = create.execute(reader, rating.id, "Mine").await.unwrap();

    let delete = DeleteCommentUseCase {
        comments: DbCommentRepository { db: t.db.clone() },
        cache: no_cache(),
    };
    let result = delete.execute(author, comment.id).await;
    assert!(
        matches!(result, Err(SocialServiceError::CommentNotFound)),
        "expected CommentNotFound, got {result:?}"
    );

    delete.execute(reader, comment.id).await.unwrap();
    let list = ListCommentsUseCase {
        comments: DbCommentRepository { db: t.db.clone() },
    };
    assert!(list.execute(rating.id).await.unwrap().is_empty());
}
