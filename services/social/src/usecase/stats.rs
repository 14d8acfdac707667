use crate::domain::repository::StatsRepository;
use crate::domain::types::{UserYearStats, YEAR_STATS_TOP_N, longest_streak};
use crate::error::SocialServiceError;

pub const MIN_STATS_YEAR: i32 = 1900;
pub const MAX_STATS_YEAR: i32 = 9999;

pub struct GetYearStatsUseCase<R: StatsRepository> {
    pub repo: R,
}

impl<R: StatsRepository> GetYearStatsUseCase<R> {
    /// Any failing section fails the whole aggregate.
    pub async fn execute(
        &self,
        user_id: i32,
        year: i32,
    ) -> Result<UserYearStats, SocialServiceError> {
        if !(MIN_STATS_YEAR..=MAX_STATS_YEAR).contains(&year) {
            return Err(SocialServiceError::InvalidYear);
        }

        let (totals, top_genres, favorite_authors, monthly, dates) = tokio::try_join!(
            self.repo.year_totals(user_id, year),
            self.repo.top_genres(user_id, year, YEAR_STATS_TOP_N),
            self.repo.favorite_authors(user_id, year, YEAR_STATS_TOP_N),
            self.repo.monthly_counts(user_id, year),
            self.repo.reading_dates(user_id, year),
        )?;

        Ok(UserYearStats {
            year,
            books_read: totals.books_read,
            average_rating: totals.average_rating,
            top_genres,
            favorite_authors,
            monthly,
            longest_streak: longest_streak(&dates),
        })
    }
}
