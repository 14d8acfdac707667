use crate::domain::repository::RankingRepository;
use crate::domain::types::{PopularBook, SimilarBook, TrendingBook};
use crate::error::SocialServiceError;

pub const DEFAULT_TRENDING_DAYS: u32 = 7;
pub const MAX_TRENDING_DAYS: u32 = 365;
pub const DEFAULT_RANKING_LIMIT: u64 = 10;
pub const DEFAULT_SIMILAR_LIMIT: u64 = 6;
pub const MAX_RANKING_LIMIT: u64 = 50;
pub const DEFAULT_MIN_RATINGS: i64 = 3;

fn ranking_limit(limit: Option<u64>, default: u64) -> u64 {
    limit.unwrap_or(default).clamp(1, MAX_RANKING_LIMIT)
}

// ── Trending ─────────────────────────────────────────────────────────────────

pub struct GetTrendingUseCase<R: RankingRepository> {
    pub repo: R,
}

impl<R: RankingRepository> GetTrendingUseCase<R> {
    pub async fn execute(
        &self,
        days: Option<u32>,
        limit: Option<u64>,
    ) -> Result<Vec<TrendingBook>, SocialServiceError> {
        let days = days
            .unwrap_or(DEFAULT_TRENDING_DAYS)
            .clamp(1, MAX_TRENDING_DAYS);
        self.repo
            .trending(days, ranking_limit(limit, DEFAULT_RANKING_LIMIT))
            .await
    }
}

// ── Popular ──────────────────────────────────────────────────────────────────

pub struct GetPopularUseCase<R: RankingRepository> {
    pub repo: R,
}

impl<R: RankingRepository> GetPopularUseCase<R> {
    pub async fn execute(
        &self,
        min_ratings: Option<i64>,
        limit: Option<u64>,
    ) -> Result<Vec<PopularBook>, SocialServiceError> {
        let min_ratings = min_ratings.unwrap_or(DEFAULT_MIN_RATINGS).max(1);
        self.repo
            .popular(min_ratings, ranking_limit(limit, DEFAULT_RANKING_LIMIT))
            .await
    }
}

// ── Similar ──────────────────────────────────────────────────────────────────

pub struct GetSimilarBooksUseCase<R: RankingRepository> {
    pub repo: R,
}

impl<R: RankingRepository> GetSimilarBooksUseCase<R> {
    /// Empty for books with too few co-raters.
    pub async fn execute(
        &self,
        book_id: i32,
        limit: Option<u64>,
    ) -> Result<Vec<SimilarBook>, SocialServiceError> {
        let books = self
            .repo
            .similar(book_id, ranking_limit(limit, DEFAULT_SIMILAR_LIMIT))
            .await?;
        // A book is never similar to itself.
        Ok(books.into_iter().filter(|b| b.book.id != book_id).collect())
    }
}
