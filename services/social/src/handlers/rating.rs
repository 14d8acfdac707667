use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use bookmarkd_auth_types::identity::{IdentityHeaders, OptionalIdentity};
use bookmarkd_domain::id::{BookId, RatingId, UserId};
use bookmarkd_domain::rating::ReadingStatus;

use crate::domain::types::{BookRatingStats, Rating, RatingSortBy, RatingWithSocial, TopRatedBook};
use crate::error::SocialServiceError;
use crate::handlers::ranking::BookResponse;
use crate::state::AppState;
use crate::usecase::rating::{
    DeleteRatingUseCase, GetBookRatingsUseCase, GetMyRatingUseCase, GetTopRatedUseCase,
    LikeRatingUseCase, ListMyRatingsUseCase, UnlikeRatingUseCase, UpdateRatingInput,
    UpdateRatingUseCase, UpsertRatingInput, UpsertRatingUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RatingResponse {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub rating: i32,
    pub review: Option<String>,
    pub status: ReadingStatus,
    #[serde(serialize_with = "bookmarkd_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "bookmarkd_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Rating> for RatingResponse {
    fn from(r: Rating) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            book_id: r.book_id,
            rating: r.rating,
            review: r.review,
            status: r.status,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct RatingWithSocialResponse {
    #[serde(flatten)]
    pub rating: RatingResponse,
    pub username: String,
    pub like_count: i64,
    pub comment_count: i64,
    pub liked_by_viewer: bool,
}

impl From<RatingWithSocial> for RatingWithSocialResponse {
    fn from(r: RatingWithSocial) -> Self {
        Self {
            rating: r.rating.into(),
            username: r.username,
            like_count: r.like_count,
            comment_count: r.comment_count,
            liked_by_viewer: r.liked_by_viewer,
        }
    }
}

#[derive(Serialize)]
pub struct BookRatingsResponse {
    pub average_rating: f64,
    pub total_ratings: i64,
    pub ratings: Vec<RatingWithSocialResponse>,
}

impl From<BookRatingStats> for BookRatingsResponse {
    fn from(stats: BookRatingStats) -> Self {
        Self {
            average_rating: stats.average_rating,
            total_ratings: stats.total_ratings,
            ratings: stats.ratings.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Serialize)]
pub struct TopRatedResponse {
    pub book: BookResponse,
    pub rating: i32,
    pub review_snippet: Option<String>,
    #[serde(serialize_with = "bookmarkd_core::serde::to_rfc3339_ms")]
    pub rated_at: chrono::DateTime<chrono::Utc>,
}

impl From<TopRatedBook> for TopRatedResponse {
    fn from(t: TopRatedBook) -> Self {
        Self {
            book: t.book.into(),
            rating: t.rating,
            review_snippet: t.review_snippet,
            rated_at: t.rated_at,
        }
    }
}

fn parse_status(raw: &str) -> Result<ReadingStatus, SocialServiceError> {
    raw.parse().map_err(|_| SocialServiceError::InvalidStatus)
}

// ── POST /books/{book_id}/ratings ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpsertRatingRequest {
    pub rating: Option<i32>,
    pub stars: Option<i32>,
    pub review: Option<String>,
    pub status: Option<String>,
}

pub async fn upsert_rating(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(book_id): Path<String>,
    Json(body): Json<UpsertRatingRequest>,
) -> Result<Json<RatingResponse>, SocialServiceError> {
    let book_id: BookId = book_id.parse()?;
    let status = body.status.as_deref().map(parse_status).transpose()?;

    let usecase = UpsertRatingUseCase {
        repo: state.rating_repo(),
        cache: state.response_cache(),
    };
    let rating = usecase
        .execute(
            identity.user_id,
            UpsertRatingInput {
                book_id: book_id.into(),
                rating: body.rating,
                stars: body.stars,
                review: body.review,
                status,
            },
        )
        .await?;
    Ok(Json(rating.into()))
}

// ── GET /books/{book_id}/ratings ─────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct BookRatingsQuery {
    pub sort_by: Option<String>,
}

pub async fn get_book_ratings(
    viewer: OptionalIdentity,
    State(state): State<AppState>,
    Path(book_id): Path<String>,
    Query(query): Query<BookRatingsQuery>,
) -> Result<Json<BookRatingsResponse>, SocialServiceError> {
    let book_id: BookId = book_id.parse()?;
    let sort_by = match query.sort_by.as_deref() {
        None | Some("") => RatingSortBy::default(),
        Some(raw) => RatingSortBy::from_snake_case(raw).ok_or(SocialServiceError::InvalidSortBy)?,
    };

    let usecase = GetBookRatingsUseCase {
        repo: state.rating_repo(),
    };
    let stats = usecase
        .execute(book_id.into(), viewer.user_id(), sort_by)
        .await?;
    Ok(Json(stats.into()))
}

// ── GET /books/{book_id}/ratings/me ──────────────────────────────────────────

pub async fn get_my_rating(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(book_id): Path<String>,
) -> Result<Json<RatingResponse>, SocialServiceError> {
    let book_id: BookId = book_id.parse()?;
    let usecase = GetMyRatingUseCase {
        repo: state.rating_repo(),
    };
    let rating = usecase.execute(identity.user_id, book_id.into()).await?;
    Ok(Json(rating.into()))
}

// ── DELETE /books/{book_id}/ratings ──────────────────────────────────────────

pub async fn delete_rating(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(book_id): Path<String>,
) -> Result<StatusCode, SocialServiceError> {
    let book_id: BookId = book_id.parse()?;
    let usecase = DeleteRatingUseCase {
        repo: state.rating_repo(),
        cache: state.response_cache(),
    };
    usecase.execute(identity.user_id, book_id.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── PATCH /ratings/{rating_id} ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateRatingRequest {
    pub rating: Option<i32>,
    pub stars: Option<i32>,
    pub review: Option<String>,
}

pub async fn update_rating(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(rating_id): Path<String>,
    Json(body): Json<UpdateRatingRequest>,
) -> Result<Json<RatingResponse>, SocialServiceError> {
    let rating_id: RatingId = rating_id.parse()?;
    let usecase = UpdateRatingUseCase {
        repo: state.rating_repo(),
        cache: state.response_cache(),
    };
    let rating = usecase
        .execute(
            identity.user_id,
            rating_id.into(),
            UpdateRatingInput {
                rating: body.rating,
                stars: body.stars,
                review: body.review,
            },
        )
        .await?;
    Ok(Json(rating.into()))
}

// ── POST /ratings/{rating_id}/like ───────────────────────────────────────────

pub async fn like_rating(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(rating_id): Path<String>,
) -> Result<StatusCode, SocialServiceError> {
    let rating_id: RatingId = rating_id.parse()?;
    let usecase = LikeRatingUseCase {
        repo: state.rating_repo(),
        cache: state.response_cache(),
    };
    usecase.execute(identity.user_id, rating_id.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /ratings/{rating_id}/like ─────────────────────────────────────────

pub async fn unlike_rating(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(rating_id): Path<String>,
) -> Result<StatusCode, SocialServiceError> {
    let rating_id: RatingId = rating_id.parse()?;
    let usecase = UnlikeRatingUseCase {
        repo: state.rating_repo(),
        cache: state.response_cache(),
    };
    usecase.execute(identity.user_id, rating_id.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /users/@me/ratings ───────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct MyRatingsQuery {
    pub status: Option<String>,
}

pub async fn get_my_ratings(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Query(query): Query<MyRatingsQuery>,
) -> Result<Json<Vec<RatingResponse>>, SocialServiceError> {
    // An empty status means every status.
    let status = match query.status.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(parse_status(raw)?),
    };
    let usecase = ListMyRatingsUseCase {
        repo: state.rating_repo(),
    };
    let ratings = usecase.execute(identity.user_id, status).await?;
    Ok(Json(ratings.into_iter().map(Into::into).collect()))
}

// ── GET /users/{user_id}/top-rated ───────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct TopRatedQuery {
    pub count: Option<u64>,
}

pub async fn get_top_rated(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<TopRatedQuery>,
) -> Result<Json<Vec<TopRatedResponse>>, SocialServiceError> {
    let user_id: UserId = user_id.parse()?;
    let usecase = GetTopRatedUseCase {
        repo: state.rating_repo(),
    };
    let books = usecase.execute(user_id.into(), query.count).await?;
    Ok(Json(books.into_iter().map(Into::into).collect()))
}
