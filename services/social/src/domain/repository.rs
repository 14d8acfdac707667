#![allow(async_fn_in_trait)]

use chrono::NaiveDate;

use bookmarkd_domain::pagination::OffsetPage;
use bookmarkd_domain::rating::ReadingStatus;

use crate::domain::types::{
    AuthorCount, BookRatingStats, Comment, CommentWithUser, FeedItem, GenreCount,
    MonthlyBookCount, PopularBook, Rating, RatingPatch, RatingSortBy, RatingUpsert, SimilarBook,
    TopRatedBook, TrendingBook, UserSummary, YearTotals,
};
use crate::error::SocialServiceError;

/// Rating Store: ratings, review likes and per-user rating lookups.
pub trait RatingRepository: Send + Sync {
    /// Insert-or-update keyed on `(user_id, book_id)`. Returns the stored row.
    async fn upsert(&self, input: &RatingUpsert) -> Result<Rating, SocialServiceError>;

    async fn find_by_id(&self, rating_id: i32) -> Result<Option<Rating>, SocialServiceError>;

    async fn find_by_user_and_book(
        &self,
        user_id: i32,
        book_id: i32,
    ) -> Result<Option<Rating>, SocialServiceError>;

    /// `status = None` lists every status.
    async fn list_by_user(
        &self,
        user_id: i32,
        status: Option<ReadingStatus>,
    ) -> Result<Vec<Rating>, SocialServiceError>;

    /// Average/count plus the individual ratings with social metadata.
    async fn find_by_book(
        &self,
        book_id: i32,
        viewer_id: Option<i32>,
        sort_by: RatingSortBy,
    ) -> Result<BookRatingStats, SocialServiceError>;

    /// Apply a patch in a single statement. Matches both id and owner; `None` when
    /// nothing matched.
    async fn update(
        &self,
        rating_id: i32,
        user_id: i32,
        patch: &RatingPatch,
    ) -> Result<Option<Rating>, SocialServiceError>;

    /// Returns `true` if a row was deleted.
    async fn delete(&self, user_id: i32, book_id: i32) -> Result<bool, SocialServiceError>;

    /// Idempotent: liking twice leaves one like.
    async fn like(&self, user_id: i32, rating_id: i32) -> Result<(), SocialServiceError>;

    /// Returns `true` if a like was removed.
    async fn unlike(&self, user_id: i32, rating_id: i32) -> Result<bool, SocialServiceError>;

    async fn top_rated_by_user(
        &self,
        user_id: i32,
        limit: u64,
    ) -> Result<Vec<TopRatedBook>, SocialServiceError>;
}

/// Comments on ratings.
pub trait CommentRepository: Send + Sync {
    async fn create(
        &self,
        user_id: i32,
        rating_id: i32,
        text: &str,
    ) -> Result<Comment, SocialServiceError>;

    /// Oldest first.
    async fn list_by_rating(
        &self,
        rating_id: i32,
    ) -> Result<Vec<CommentWithUser>, SocialServiceError>;

    /// Deletes only the author's own comment. Returns `true` if a row was deleted.
    async fn delete(&self, comment_id: i32, user_id: i32) -> Result<bool, SocialServiceError>;
}

/// Social Graph Store: directed follow edges.
pub trait FollowRepository: Send + Sync {
    /// Returns `false` when the edge already existed.
    async fn follow(
        &self,
        follower_id: i32,
        following_id: i32,
    ) -> Result<bool, SocialServiceError>;

    /// Returns `true` if an edge was removed.
    async fn unfollow(
        &self,
        follower_id: i32,
        following_id: i32,
    ) -> Result<bool, SocialServiceError>;

    async fn is_following(
        &self,
        follower_id: i32,
        following_id: i32,
    ) -> Result<bool, SocialServiceError>;

    /// Users following `user_id`, newest edge first.
    async fn followers(&self, user_id: i32) -> Result<Vec<UserSummary>, SocialServiceError>;

    /// Users `user_id` follows, newest edge first.
    async fn following(&self, user_id: i32) -> Result<Vec<UserSummary>, SocialServiceError>;

    /// `(followers, following)`
    async fn counts(&self, user_id: i32) -> Result<(i64, i64), SocialServiceError>;
}

/// Feed Composer.
pub trait FeedRepository: Send + Sync {
    /// Newest first. `following_only` has no effect without a viewer.
    async fn feed(
        &self,
        viewer_id: Option<i32>,
        following_only: bool,
        page: OffsetPage,
    ) -> Result<Vec<FeedItem>, SocialServiceError>;
}

/// Recommendation/Ranking Engine.
pub trait RankingRepository: Send + Sync {
    async fn trending(
        &self,
        days: u32,
        limit: u64,
    ) -> Result<Vec<TrendingBook>, SocialServiceError>;

    async fn popular(
        &self,
        min_ratings: i64,
        limit: u64,
    ) -> Result<Vec<PopularBook>, SocialServiceError>;

    async fn similar(
        &self,
        book_id: i32,
        limit: u64,
    ) -> Result<Vec<SimilarBook>, SocialServiceError>;
}

/// Stats Aggregator sub-queries. All are scoped to `rating > 0` within one calendar year.
pub trait StatsRepository: Send + Sync {
    async fn year_totals(&self, user_id: i32, year: i32) -> Result<YearTotals, SocialServiceError>;

    async fn top_genres(
        &self,
        user_id: i32,
        year: i32,
        limit: u64,
    ) -> Result<Vec<GenreCount>, SocialServiceError>;

    async fn favorite_authors(
        &self,
        user_id: i32,
        year: i32,
        limit: u64,
    ) -> Result<Vec<AuthorCount>, SocialServiceError>;

    /// Sparse, ascending by month.
    async fn monthly_counts(
        &self,
        user_id: i32,
        year: i32,
    ) -> Result<Vec<MonthlyBookCount>, SocialServiceError>;

    /// Distinct dates with at least one qualifying rating.
    async fn reading_dates(
        &self,
        user_id: i32,
        year: i32,
    ) -> Result<Vec<NaiveDate>, SocialServiceError>;
}

/// Response cache side channel. Callers treat failures as misses.
///
/// Futures are `Send` so the cache can sit behind axum middleware generically.
pub trait ResponseCache: Send + Sync {
    /// A disabled cache is bypassed entirely.
    fn enabled(&self) -> bool {
        true
    }

    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, SocialServiceError>> + Send;

    fn set(
        &self,
        key: &str,
        value: &str,
        ttl_secs: u64,
    ) -> impl Future<Output = Result<(), SocialServiceError>> + Send;

    /// Delete every key matching any of the glob patterns.
    fn invalidate(
        &self,
        patterns: &[String],
    ) -> impl Future<Output = Result<(), SocialServiceError>> + Send;

    /// Like [`ResponseCache::invalidate`], logging failures instead of returning them.
    async fn invalidate_all(&self, patterns: &[String]) {
        if let Err(e) = self.invalidate(patterns).await {
            tracing::warn!(error = ?e, ?patterns, "cache invalidation failed");
        }
    }
}
