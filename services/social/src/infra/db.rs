use anyhow::Context as _;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder, Statement,
    sea_query::{Expr, OnConflict},
};

use bookmarkd_domain::pagination::OffsetPage;
use bookmarkd_domain::rating::ReadingStatus;
use bookmarkd_social_schema::{comments, follows, ratings, review_likes};

use crate::domain::repository::{
    CommentRepository, FeedRepository, FollowRepository, RankingRepository, RatingRepository,
    StatsRepository,
};
use crate::domain::types::{
    AuthorCount, BookRatingStats, BookSummary, Comment, CommentWithUser, FeedItem, GenreCount,
    MonthlyBookCount, PopularBook, Rating, RatingPatch, RatingSortBy, RatingUpsert,
    RatingWithSocial, SimilarBook, TopRatedBook, TrendingBook, UserSummary, YearTotals,
    review_snippet,
};
use crate::error::SocialServiceError;

/// Minimum score for a rating to count as "liked" in co-rater matching.
const SIMILAR_LIKE_THRESHOLD: i32 = bookmarkd_domain::rating::LIKED_THRESHOLD;
const SIMILAR_MIN_CO_RATERS: i64 = 2;

// ── Rating repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRatingRepository {
    pub db: DatabaseConnection,
}

/// Columns of `ratings` joined with the author and like/comment aggregates.
///
/// `$1` is the book id, `$2` the nullable viewer id.
const BOOK_RATINGS_SQL: &str = r#"
    SELECT
        r.id, r.user_id, r.book_id, r.rating, r.review, r.status, r.created_at, r.updated_at,
        u.username,
        COUNT(DISTINCT rl.user_id) AS like_count,
        COUNT(DISTINCT c.id) AS comment_count,
        EXISTS(
            SELECT 1 FROM review_likes vl WHERE vl.rating_id = r.id AND vl.user_id = $2
        ) AS liked_by_viewer
    FROM ratings r
    JOIN users u ON u.id = r.user_id
    LEFT JOIN review_likes rl ON rl.rating_id = r.id
    LEFT JOIN comments c ON c.rating_id = r.id
    WHERE r.book_id = $1
    GROUP BY r.id, u.username
"#;

#[derive(Debug, FromQueryResult)]
struct RatingSocialRow {
    id: i32,
    user_id: i32,
    book_id: i32,
    rating: i32,
    review: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    username: String,
    like_count: i64,
    comment_count: i64,
    liked_by_viewer: bool,
}

#[derive(Debug, FromQueryResult)]
struct BookAggregateRow {
    average_rating: f64,
    total_ratings: i64,
}

impl RatingRepository for DbRatingRepository {
    async fn upsert(&self, input: &RatingUpsert) -> Result<Rating, SocialServiceError> {
        let now = Utc::now();
        let model = ratings::Entity::insert(ratings::ActiveModel {
            user_id: Set(input.user_id),
            book_id: Set(input.book_id),
            rating: Set(input.rating),
            review: Set(input.review.clone()),
            status: Set(input.status.as_str().to_owned()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::columns([ratings::Column::UserId, ratings::Column::BookId])
                .update_columns([
                    ratings::Column::Rating,
                    ratings::Column::Review,
                    ratings::Column::Status,
                    ratings::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_with_returning(&self.db)
        .await
        .context("upsert rating")?;
        rating_from_model(model)
    }

    async fn find_by_id(&self, rating_id: i32) -> Result<Option<Rating>, SocialServiceError> {
        let model = ratings::Entity::find_by_id(rating_id)
            .one(&self.db)
            .await
            .context("find rating by id")?;
        model.map(rating_from_model).transpose()
    }

    async fn find_by_user_and_book(
        &self,
        user_id: i32,
        book_id: i32,
    ) -> Result<Option<Rating>, SocialServiceError> {
        let model = ratings::Entity::find()
            .filter(ratings::Column::UserId.eq(user_id))
            .filter(ratings::Column::BookId.eq(book_id))
            .one(&self.db)
            .await
            .context("find rating by user and book")?;
        model.map(rating_from_model).transpose()
    }

    async fn list_by_user(
        &self,
        user_id: i32,
        status: Option<ReadingStatus>,
    ) -> Result<Vec<Rating>, SocialServiceError> {
        let mut query = ratings::Entity::find().filter(ratings::Column::UserId.eq(user_id));
        if let Some(status) = status {
            query = query.filter(ratings::Column::Status.eq(status.as_str()));
        }
        let models = query
            .order_by_desc(ratings::Column::CreatedAt)
            .order_by_desc(ratings::Column::Id)
            .all(&self.db)
            .await
            .context("list ratings by user")?;
        models.into_iter().map(rating_from_model).collect()
    }

    async fn find_by_book(
        &self,
        book_id: i32,
        viewer_id: Option<i32>,
        sort_by: RatingSortBy,
    ) -> Result<BookRatingStats, SocialServiceError> {
        let backend = self.db.get_database_backend();

        let aggregate = BookAggregateRow::find_by_statement(Statement::from_sql_and_values(
            backend,
            r#"
            SELECT COALESCE(AVG(rating), 0)::float8 AS average_rating, COUNT(*) AS total_ratings
            FROM ratings
            WHERE book_id = $1
            "#,
            [book_id.into()],
        ))
        .one(&self.db)
        .await
        .context("aggregate book ratings")?
        .unwrap_or(BookAggregateRow {
            average_rating: 0.0,
            total_ratings: 0,
        });

        let order_clause = match sort_by {
            RatingSortBy::Newest => "r.created_at DESC, r.id DESC",
            RatingSortBy::MostLiked => "like_count DESC, r.created_at DESC, r.id DESC",
            RatingSortBy::HighestRating => "r.rating DESC, r.created_at DESC, r.id DESC",
        };
        let sql = format!("{BOOK_RATINGS_SQL} ORDER BY {order_clause}");

        let rows = RatingSocialRow::find_by_statement(Statement::from_sql_and_values(
            backend,
            &sql,
            [book_id.into(), viewer_id.into()],
        ))
        .all(&self.db)
        .await
        .context("list book ratings with social data")?;

        let ratings = rows
            .into_iter()
            .map(|row| {
                let rating = Rating {
                    id: row.id,
                    user_id: row.user_id,
                    book_id: row.book_id,
                    rating: row.rating,
                    review: row.review,
                    status: parse_status(&row.status)?,
                    created_at: row.created_at,
                    updated_at: row.updated_at,
                };
                Ok(RatingWithSocial {
                    rating,
                    username: row.username,
                    like_count: row.like_count,
                    comment_count: row.comment_count,
                    liked_by_viewer: row.liked_by_viewer,
                })
            })
            .collect::<Result<Vec<_>, SocialServiceError>>()?;

        Ok(BookRatingStats {
            average_rating: aggregate.average_rating,
            total_ratings: aggregate.total_ratings,
            ratings,
        })
    }

    async fn update(
        &self,
        rating_id: i32,
        user_id: i32,
        patch: &RatingPatch,
    ) -> Result<Option<Rating>, SocialServiceError> {
        let mut update = ratings::Entity::update_many()
            .col_expr(ratings::Column::UpdatedAt, Expr::value(Utc::now()));
        if let Some(rating) = patch.rating {
            update = update.col_expr(ratings::Column::Rating, Expr::value(rating));
        }
        if let Some(review) = &patch.review {
            update = update.col_expr(ratings::Column::Review, Expr::value(review.clone()));
        }
        let models = update
            .filter(ratings::Column::Id.eq(rating_id))
            .filter(ratings::Column::UserId.eq(user_id))
            .exec_with_returning(&self.db)
            .await
            .context("update rating")?;
        models.into_iter().next().map(rating_from_model).transpose()
    }

    async fn delete(&self, user_id: i32, book_id: i32) -> Result<bool, SocialServiceError> {
        let result = ratings::Entity::delete_many()
            .filter(ratings::Column::UserId.eq(user_id))
            .filter(ratings::Column::BookId.eq(book_id))
            .exec(&self.db)
            .await
            .context("delete rating")?;
        Ok(result.rows_affected > 0)
    }

    async fn like(&self, user_id: i32, rating_id: i32) -> Result<(), SocialServiceError> {
        review_likes::Entity::insert(review_likes::ActiveModel {
            user_id: Set(user_id),
            rating_id: Set(rating_id),
            created_at: Set(Utc::now()),
        })
        .on_conflict(
            OnConflict::columns([review_likes::Column::UserId, review_likes::Column::RatingId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("insert review like")?;
        Ok(())
    }

    async fn unlike(&self, user_id: i32, rating_id: i32) -> Result<bool, SocialServiceError> {
        let result = review_likes::Entity::delete_many()
            .filter(review_likes::Column::UserId.eq(user_id))
            .filter(review_likes::Column::RatingId.eq(rating_id))
            .exec(&self.db)
            .await
            .context("delete review like")?;
        Ok(result.rows_affected > 0)
    }

    async fn top_rated_by_user(
        &self,
        user_id: i32,
        limit: u64,
    ) -> Result<Vec<TopRatedBook>, SocialServiceError> {
        #[derive(Debug, FromQueryResult)]
        struct TopRatedRow {
            id: i32,
            title: String,
            author: String,
            cover_url: Option<String>,
            rating: i32,
            review: Option<String>,
            created_at: DateTime<Utc>,
        }

        let rows = TopRatedRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            r#"
            SELECT b.id, b.title, b.author, b.cover_url, r.rating, r.review, r.created_at
            FROM ratings r
            JOIN books b ON b.id = r.book_id
            WHERE r.user_id = $1 AND r.rating > 0
            ORDER BY r.rating DESC, r.created_at DESC
            LIMIT $2
            "#,
            [user_id.into(), (limit as i64).into()],
        ))
        .all(&self.db)
        .await
        .context("list top rated books")?;

        Ok(rows
            .into_iter()
            .map(|row| TopRatedBook {
                book: BookSummary {
                    id: row.id,
                    title: row.title,
                    author: row.author,
                    cover_url: row.cover_url,
                },
                rating: row.rating,
                review_snippet: row.review.as_deref().map(review_snippet),
                rated_at: row.created_at,
            })
            .collect())
    }
}

fn parse_status(raw: &str) -> Result<ReadingStatus, SocialServiceError> {
    raw.parse::<ReadingStatus>()
        .with_context(|| format!("stored rating has unknown status {raw:?}"))
        .map_err(SocialServiceError::from)
}

fn rating_from_model(model: ratings::Model) -> Result<Rating, SocialServiceError> {
    Ok(Rating {
        id: model.id,
        user_id: model.user_id,
        book_id: model.book_id,
        rating: model.rating,
        status: parse_status(&model.status)?,
        review: model.review,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Comment repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCommentRepository {
    pub db: DatabaseConnection,
}

impl CommentRepository for DbCommentRepository {
    async fn create(
        &self,
        user_id: i32,
        rating_id: i32,
        text: &str,
    ) -> Result<Comment, SocialServiceError> {
        let model = comments::ActiveModel {
            user_id: Set(user_id),
            rating_id: Set(rating_id),
            text: Set(text.to_owned()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create comment")?;
        Ok(comment_from_model(model))
    }

    async fn list_by_rating(
        &self,
        rating_id: i32,
    ) -> Result<Vec<CommentWithUser>, SocialServiceError> {
        #[derive(Debug, FromQueryResult)]
        struct CommentRow {
            id: i32,
            user_id: i32,
            rating_id: i32,
            text: String,
            created_at: DateTime<Utc>,
            username: String,
        }

        let rows = CommentRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            r#"
            SELECT c.id, c.user_id, c.rating_id, c.text, c.created_at, u.username
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.rating_id = $1
            ORDER BY c.created_at ASC, c.id ASC
            "#,
            [rating_id.into()],
        ))
        .all(&self.db)
        .await
        .context("list comments by rating")?;

        Ok(rows
            .into_iter()
            .map(|row| CommentWithUser {
                comment: Comment {
                    id: row.id,
                    user_id: row.user_id,
                    rating_id: row.rating_id,
                    text: row.text,
                    created_at: row.created_at,
                },
                username: row.username,
            })
            .collect())
    }

    async fn delete(&self, comment_id: i32, user_id: i32) -> Result<bool, SocialServiceError> {
        let result = comments::Entity::delete_many()
            .filter(comments::Column::Id.eq(comment_id))
            .filter(comments::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("delete comment")?;
        Ok(result.rows_affected > 0)
    }
}

fn comment_from_model(model: comments::Model) -> Comment {
    Comment {
        id: model.id,
        user_id: model.user_id,
        rating_id: model.rating_id,
        text: model.text,
        created_at: model.created_at,
    }
}

// ── Follow repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbFollowRepository {
    pub db: DatabaseConnection,
}

#[derive(Debug, FromQueryResult)]
struct UserSummaryRow {
    id: i32,
    username: String,
    followed_at: DateTime<Utc>,
}

impl From<UserSummaryRow> for UserSummary {
    fn from(row: UserSummaryRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            followed_at: row.followed_at,
        }
    }
}

impl DbFollowRepository {
    async fn list_edges(
        &self,
        sql: &str,
        user_id: i32,
        what: &'static str,
    ) -> Result<Vec<UserSummary>, SocialServiceError> {
        let rows = UserSummaryRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            sql,
            [user_id.into()],
        ))
        .all(&self.db)
        .await
        .context(what)?;
        Ok(rows.into_iter().map(UserSummary::from).collect())
    }
}

impl FollowRepository for DbFollowRepository {
    async fn follow(
        &self,
        follower_id: i32,
        following_id: i32,
    ) -> Result<bool, SocialServiceError> {
        let inserted = follows::Entity::insert(follows::ActiveModel {
            follower_id: Set(follower_id),
            following_id: Set(following_id),
            created_at: Set(Utc::now()),
        })
        .on_conflict(
            OnConflict::columns([follows::Column::FollowerId, follows::Column::FollowingId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("insert follow")?;
        Ok(inserted > 0)
    }

    async fn unfollow(
        &self,
        follower_id: i32,
        following_id: i32,
    ) -> Result<bool, SocialServiceError> {
        let result = follows::Entity::delete_many()
            .filter(follows::Column::FollowerId.eq(follower_id))
            .filter(follows::Column::FollowingId.eq(following_id))
            .exec(&self.db)
            .await
            .context("delete follow")?;
        Ok(result.rows_affected > 0)
    }

    async fn is_following(
        &self,
        follower_id: i32,
        following_id: i32,
    ) -> Result<bool, SocialServiceError> {
        let edge = follows::Entity::find_by_id((follower_id, following_id))
            .one(&self.db)
            .await
            .context("find follow edge")?;
        Ok(edge.is_some())
    }

    async fn followers(&self, user_id: i32) -> Result<Vec<UserSummary>, SocialServiceError> {
        self.list_edges(
            r#"
            SELECT u.id, u.username, f.created_at AS followed_at
            FROM follows f
            JOIN users u ON u.id = f.follower_id
            WHERE f.following_id = $1
            ORDER BY f.created_at DESC, u.id
            "#,
            user_id,
            "list followers",
        )
        .await
    }

    async fn following(&self, user_id: i32) -> Result<Vec<UserSummary>, SocialServiceError> {
        self.list_edges(
            r#"
            SELECT u.id, u.username, f.created_at AS followed_at
            FROM follows f
            JOIN users u ON u.id = f.following_id
            WHERE f.follower_id = $1
            ORDER BY f.created_at DESC, u.id
            "#,
            user_id,
            "list following",
        )
        .await
    }

    async fn counts(&self, user_id: i32) -> Result<(i64, i64), SocialServiceError> {
        let followers = follows::Entity::find()
            .filter(follows::Column::FollowingId.eq(user_id))
            .count(&self.db)
            .await
            .context("count followers")?;
        let following = follows::Entity::find()
            .filter(follows::Column::FollowerId.eq(user_id))
            .count(&self.db)
            .await
            .context("count following")?;
        Ok((followers as i64, following as i64))
    }
}

// ── Feed repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbFeedRepository {
    pub db: DatabaseConnection,
}

impl FeedRepository for DbFeedRepository {
    async fn feed(
        &self,
        viewer_id: Option<i32>,
        following_only: bool,
        page: OffsetPage,
    ) -> Result<Vec<FeedItem>, SocialServiceError> {
        #[derive(Debug, FromQueryResult)]
        struct FeedRow {
            id: i32,
            user_id: i32,
            book_id: i32,
            rating: i32,
            review: Option<String>,
            status: String,
            created_at: DateTime<Utc>,
            updated_at: DateTime<Utc>,
            username: String,
            title: String,
            author: String,
            cover_url: Option<String>,
            like_count: i64,
            comment_count: i64,
            liked_by_viewer: bool,
        }

        // Without a viewer there is no graph to restrict by.
        let restrict = following_only && viewer_id.is_some();

        let rows = FeedRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            r#"
            SELECT
                r.id, r.user_id, r.book_id, r.rating, r.review, r.status,
                r.created_at, r.updated_at,
                u.username,
                b.title, b.author, b.cover_url,
                COUNT(DISTINCT rl.user_id) AS like_count,
                COUNT(DISTINCT c.id) AS comment_count,
                EXISTS(
                    SELECT 1 FROM review_likes vl WHERE vl.rating_id = r.id AND vl.user_id = $1
                ) AS liked_by_viewer
            FROM ratings r
            JOIN users u ON u.id = r.user_id
            JOIN books b ON b.id = r.book_id
            LEFT JOIN review_likes rl ON rl.rating_id = r.id
            LEFT JOIN comments c ON c.rating_id = r.id
            WHERE NOT $2
               OR r.user_id IN (SELECT f.following_id FROM follows f WHERE f.follower_id = $1)
            GROUP BY r.id, u.username, b.id
            ORDER BY r.created_at DESC, r.id DESC
            LIMIT $3 OFFSET $4
            "#,
            [
                viewer_id.into(),
                restrict.into(),
                i64::from(page.limit).into(),
                i64::from(page.offset).into(),
            ],
        ))
        .all(&self.db)
        .await
        .context("compose feed")?;

        rows.into_iter()
            .map(|row| {
                Ok(FeedItem {
                    rating: Rating {
                        id: row.id,
                        user_id: row.user_id,
                        book_id: row.book_id,
                        rating: row.rating,
                        review: row.review,
                        status: parse_status(&row.status)?,
                        created_at: row.created_at,
                        updated_at: row.updated_at,
                    },
                    username: row.username,
                    book: BookSummary {
                        id: row.book_id,
                        title: row.title,
                        author: row.author,
                        cover_url: row.cover_url,
                    },
                    like_count: row.like_count,
                    comment_count: row.comment_count,
                    liked_by_viewer: row.liked_by_viewer,
                })
            })
            .collect()
    }
}

// ── Ranking repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRankingRepository {
    pub db: DatabaseConnection,
}

/// A book plus two metrics; the rankings differ only in which metric is which.
#[derive(Debug, FromQueryResult)]
struct RankedBookRow {
    id: i32,
    title: String,
    author: String,
    cover_url: Option<String>,
    book_count: i64,
    average_rating: f64,
}

impl RankedBookRow {
    fn book(&self) -> BookSummary {
        BookSummary {
            id: self.id,
            title: self.title.clone(),
            author: self.author.clone(),
            cover_url: self.cover_url.clone(),
        }
    }
}

impl DbRankingRepository {
    async fn ranked(
        &self,
        sql: &str,
        values: [sea_orm::Value; 2],
        what: &'static str,
    ) -> Result<Vec<RankedBookRow>, SocialServiceError> {
        let rows = RankedBookRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            sql,
            values,
        ))
        .all(&self.db)
        .await
        .context(what)?;
        Ok(rows)
    }
}

impl RankingRepository for DbRankingRepository {
    async fn trending(
        &self,
        days: u32,
        limit: u64,
    ) -> Result<Vec<TrendingBook>, SocialServiceError> {
        let days = i32::try_from(days).context("trending window out of range")?;
        let rows = self
            .ranked(
                r#"
                SELECT
                    b.id, b.title, b.author, b.cover_url,
                    COUNT(r.id) AS book_count,
                    COALESCE(AVG(r.rating), 0)::float8 AS average_rating
                FROM ratings r
                JOIN books b ON b.id = r.book_id
                WHERE r.created_at >= NOW() - make_interval(days => $1)
                GROUP BY b.id
                HAVING COUNT(r.id) >= 1
                ORDER BY book_count DESC, average_rating DESC, b.id
                LIMIT $2
                "#,
                [days.into(), (limit as i64).into()],
                "rank trending books",
            )
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| TrendingBook {
                book: row.book(),
                rating_count: row.book_count,
                average_rating: row.average_rating,
            })
            .collect())
    }

    async fn popular(
        &self,
        min_ratings: i64,
        limit: u64,
    ) -> Result<Vec<PopularBook>, SocialServiceError> {
        let rows = self
            .ranked(
                r#"
                SELECT
                    b.id, b.title, b.author, b.cover_url,
                    COUNT(r.id) AS book_count,
                    COALESCE(AVG(r.rating), 0)::float8 AS average_rating
                FROM books b
                JOIN ratings r ON r.book_id = b.id
                GROUP BY b.id
                HAVING COUNT(r.id) >= $1
                ORDER BY average_rating DESC, book_count DESC, b.id
                LIMIT $2
                "#,
                [min_ratings.into(), (limit as i64).into()],
                "rank popular books",
            )
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| PopularBook {
                book: row.book(),
                average_rating: row.average_rating,
                rating_count: row.book_count,
            })
            .collect())
    }

    async fn similar(
        &self,
        book_id: i32,
        limit: u64,
    ) -> Result<Vec<SimilarBook>, SocialServiceError> {
        let sql = format!(
            r#"
            WITH co_raters AS (
                SELECT DISTINCT user_id
                FROM ratings
                WHERE book_id = $1 AND rating >= {SIMILAR_LIKE_THRESHOLD}
            ),
            candidates AS (
                SELECT r.book_id, COUNT(DISTINCT r.user_id) AS common_users
                FROM ratings r
                JOIN co_raters cr ON cr.user_id = r.user_id
                WHERE r.book_id <> $1 AND r.rating >= {SIMILAR_LIKE_THRESHOLD}
                GROUP BY r.book_id
                HAVING COUNT(DISTINCT r.user_id) >= {SIMILAR_MIN_CO_RATERS}
            )
            SELECT
                b.id, b.title, b.author, b.cover_url,
                cand.common_users AS book_count,
                COALESCE(AVG(r.rating), 0)::float8 AS average_rating
            FROM candidates cand
            JOIN books b ON b.id = cand.book_id
            LEFT JOIN ratings r ON r.book_id = b.id
            GROUP BY b.id, cand.common_users
            ORDER BY cand.common_users DESC, average_rating DESC, b.id
            LIMIT $2
            "#
        );
        let rows = self
            .ranked(
                &sql,
                [book_id.into(), (limit as i64).into()],
                "rank similar books",
            )
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| SimilarBook {
                book: row.book(),
                common_users: row.book_count,
                average_rating: row.average_rating,
            })
            .collect())
    }
}

// ── Stats repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbStatsRepository {
    pub db: DatabaseConnection,
}

/// Qualifying ratings for `$1` user in `$2` year.
const YEAR_FILTER: &str =
    "r.user_id = $1 AND r.rating > 0 AND EXTRACT(YEAR FROM r.created_at)::int = $2";

impl DbStatsRepository {
    fn statement(&self, sql: &str, user_id: i32, year: i32) -> Statement {
        Statement::from_sql_and_values(
            self.db.get_database_backend(),
            sql,
            [user_id.into(), year.into()],
        )
    }
}

impl StatsRepository for DbStatsRepository {
    async fn year_totals(&self, user_id: i32, year: i32) -> Result<YearTotals, SocialServiceError> {
        #[derive(Debug, FromQueryResult)]
        struct TotalsRow {
            books_read: i64,
            average_rating: f64,
        }

        let sql = format!(
            "SELECT COUNT(DISTINCT r.book_id) AS books_read, \
             COALESCE(AVG(r.rating), 0)::float8 AS average_rating \
             FROM ratings r WHERE {YEAR_FILTER}"
        );
        let row = TotalsRow::find_by_statement(self.statement(&sql, user_id, year))
            .one(&self.db)
            .await
            .context("year totals")?;
        Ok(row
            .map(|row| YearTotals {
                books_read: row.books_read,
                average_rating: row.average_rating,
            })
            .unwrap_or_default())
    }

    async fn top_genres(
        &self,
        user_id: i32,
        year: i32,
        limit: u64,
    ) -> Result<Vec<GenreCount>, SocialServiceError> {
        #[derive(Debug, FromQueryResult)]
        struct GenreRow {
            genre: String,
            count: i64,
        }

        let sql = format!(
            r#"
            SELECT g.name AS genre, COUNT(DISTINCT r.book_id) AS count
            FROM ratings r
            JOIN book_genres bg ON bg.book_id = r.book_id
            JOIN genres g ON g.id = bg.genre_id
            WHERE {YEAR_FILTER}
            GROUP BY g.name
            ORDER BY count DESC, g.name
            LIMIT {limit}
            "#
        );
        let rows = GenreRow::find_by_statement(self.statement(&sql, user_id, year))
            .all(&self.db)
            .await
            .context("year top genres")?;
        Ok(rows
            .into_iter()
            .map(|row| GenreCount {
                genre: row.genre,
                count: row.count,
            })
            .collect())
    }

    async fn favorite_authors(
        &self,
        user_id: i32,
        year: i32,
        limit: u64,
    ) -> Result<Vec<AuthorCount>, SocialServiceError> {
        #[derive(Debug, FromQueryResult)]
        struct AuthorRow {
            author: String,
            count: i64,
        }

        let sql = format!(
            r#"
            SELECT b.author, COUNT(DISTINCT r.book_id) AS count
            FROM ratings r
            JOIN books b ON b.id = r.book_id
            WHERE {YEAR_FILTER}
            GROUP BY b.author
            ORDER BY count DESC, b.author
            LIMIT {limit}
            "#
        );
        let rows = AuthorRow::find_by_statement(self.statement(&sql, user_id, year))
            .all(&self.db)
            .await
            .context("year favorite authors")?;
        Ok(rows
            .into_iter()
            .map(|row| AuthorCount {
                author: row.author,
                count: row.count,
            })
            .collect())
    }

    async fn monthly_counts(
        &self,
        user_id: i32,
        year: i32,
    ) -> Result<Vec<MonthlyBookCount>, SocialServiceError> {
        #[derive(Debug, FromQueryResult)]
        struct MonthRow {
            month: i32,
            count: i64,
        }

        let sql = format!(
            r#"
            SELECT EXTRACT(MONTH FROM r.created_at)::int AS month,
                   COUNT(DISTINCT r.book_id) AS count
            FROM ratings r
            WHERE {YEAR_FILTER}
            GROUP BY month
            ORDER BY month
            "#
        );
        let rows = MonthRow::find_by_statement(self.statement(&sql, user_id, year))
            .all(&self.db)
            .await
            .context("year monthly counts")?;
        Ok(rows
            .into_iter()
            .map(|row| MonthlyBookCount {
                month: row.month.clamp(1, 12) as u32,
                count: row.count,
            })
            .collect())
    }

    async fn reading_dates(
        &self,
        user_id: i32,
        year: i32,
    ) -> Result<Vec<NaiveDate>, SocialServiceError> {
        #[derive(Debug, FromQueryResult)]
        struct DateRow {
            day: NaiveDate,
        }

        let sql = format!(
            r#"
            SELECT DISTINCT (r.created_at AT TIME ZONE 'UTC')::date AS day
            FROM ratings r
            WHERE {YEAR_FILTER}
            ORDER BY day
            "#
        );
        let rows = DateRow::find_by_statement(self.statement(&sql, user_id, year))
            .all(&self.db)
            .await
            .context("year reading dates")?;
        Ok(rows.into_iter().map(|row| row.day).collect())
    }
}
