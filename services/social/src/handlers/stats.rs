use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use bookmarkd_domain::id::UserId;

use crate::domain::types::{AuthorCount, GenreCount, MonthlyBookCount, UserYearStats};
use crate::error::SocialServiceError;
use crate::state::AppState;
use crate::usecase::stats::GetYearStatsUseCase;

#[derive(Serialize)]
pub struct GenreCountResponse {
    pub genre: String,
    pub count: i64,
}

#[derive(Serialize)]
pub struct AuthorCountResponse {
    pub author: String,
    pub count: i64,
}

#[derive(Serialize)]
pub struct MonthlyCountResponse {
    pub month: u32,
    pub count: i64,
}

#[derive(Serialize)]
pub struct YearStatsResponse {
    pub year: i32,
    pub books_read: i64,
    pub average_rating: f64,
    pub top_genres: Vec<GenreCountResponse>,
    pub favorite_authors: Vec<AuthorCountResponse>,
    /// Months with at least one book, ascending.
    pub monthly: Vec<MonthlyCountResponse>,
    /// All twelve months, January first, zero-filled.
    pub months: [i64; 12],
    pub longest_streak: u32,
}

impl From<UserYearStats> for YearStatsResponse {
    fn from(stats: UserYearStats) -> Self {
        let months = stats.dense_monthly();
        Self {
            year: stats.year,
            books_read: stats.books_read,
            average_rating: stats.average_rating,
            top_genres: stats
                .top_genres
                .into_iter()
                .map(|GenreCount { genre, count }| GenreCountResponse { genre, count })
                .collect(),
            favorite_authors: stats
                .favorite_authors
                .into_iter()
                .map(|AuthorCount { author, count }| AuthorCountResponse { author, count })
                .collect(),
            monthly: stats
                .monthly
                .into_iter()
                .map(|MonthlyBookCount { month, count }| MonthlyCountResponse { month, count })
                .collect(),
            months,
            longest_streak: stats.longest_streak,
        }
    }
}

/// Handler for `GET /users/{user_id}/stats/year/{year}`.
pub async fn get_year_stats(
    State(state): State<AppState>,
    Path((user_id, year)): Path<(String, String)>,
) -> Result<Json<YearStatsResponse>, SocialServiceError> {
    let user_id: UserId = user_id.parse()?;
    let year: i32 = year
        .trim()
        .parse()
        .map_err(|_| SocialServiceError::InvalidYear)?;

    let usecase = GetYearStatsUseCase {
        repo: state.stats_repo(),
    };
    let stats = usecase.execute(user_id.into(), year).await?;
    Ok(Json(stats.into()))
}
