use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use bookmarkd_domain::id::BookId;

use crate::domain::types::{BookSummary, PopularBook, SimilarBook, TrendingBook};
use crate::error::SocialServiceError;
use crate::state::AppState;
use crate::usecase::ranking::{GetPopularUseCase, GetSimilarBooksUseCase, GetTrendingUseCase};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub cover_url: Option<String>,
}

impl From<BookSummary> for BookResponse {
    fn from(b: BookSummary) -> Self {
        Self {
            id: b.id,
            title: b.title,
            author: b.author,
            cover_url: b.cover_url,
        }
    }
}

#[derive(Serialize)]
pub struct TrendingBookResponse {
    pub book: BookResponse,
    pub rating_count: i64,
    pub average_rating: f64,
}

impl From<TrendingBook> for TrendingBookResponse {
    fn from(t: TrendingBook) -> Self {
        Self {
            book: t.book.into(),
            rating_count: t.rating_count,
            average_rating: t.average_rating,
        }
    }
}

#[derive(Serialize)]
pub struct PopularBookResponse {
    pub book: BookResponse,
    pub average_rating: f64,
    pub rating_count: i64,
}

impl From<PopularBook> for PopularBookResponse {
    fn from(p: PopularBook) -> Self {
        Self {
            book: p.book.into(),
            average_rating: p.average_rating,
            rating_count: p.rating_count,
        }
    }
}

#[derive(Serialize)]
pub struct SimilarBookResponse {
    pub book: BookResponse,
    pub common_users: i64,
    pub average_rating: f64,
}

impl From<SimilarBook> for SimilarBookResponse {
    fn from(s: SimilarBook) -> Self {
        Self {
            book: s.book.into(),
            common_users: s.common_users,
            average_rating: s.average_rating,
        }
    }
}

// ── Query params ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct TrendingQuery {
    pub days: Option<u32>,
    pub limit: Option<u64>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct PopularQuery {
    pub min_ratings: Option<i64>,
    pub limit: Option<u64>,
}

#[derive(Deserialize, Default)]
pub struct SimilarQuery {
    pub limit: Option<u64>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

pub async fn get_trending(
    State(state): State<AppState>,
    Query(query): Query<TrendingQuery>,
) -> Result<Json<Vec<TrendingBookResponse>>, SocialServiceError> {
    let usecase = GetTrendingUseCase {
        repo: state.ranking_repo(),
    };
    let books = usecase.execute(query.days, query.limit).await?;
    Ok(Json(books.into_iter().map(Into::into).collect()))
}

pub async fn get_popular(
    State(state): State<AppState>,
    Query(query): Query<PopularQuery>,
) -> Result<Json<Vec<PopularBookResponse>>, SocialServiceError> {
    let usecase = GetPopularUseCase {
        repo: state.ranking_repo(),
    };
    let books = usecase.execute(query.min_ratings, query.limit).await?;
    Ok(Json(books.into_iter().map(Into::into).collect()))
}

pub async fn get_similar(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
    Query(query): Query<SimilarQuery>,
) -> Result<Json<Vec<SimilarBookResponse>>, SocialServiceError> {
    let book_id: BookId = book_id.parse()?;
    let usecase = GetSimilarBooksUseCase {
        repo: state.ranking_repo(),
    };
    let books = usecase.execute(book_id.into(), query.limit).await?;
    Ok(Json(books.into_iter().map(Into::into).collect()))
}
