use bookmarkd_domain::rating::{ReadingStatus, from_five_star, validate_score};

use crate::domain::cache::{engagement_patterns, rating_write_patterns};
use crate::domain::repository::{RatingRepository, ResponseCache};
use crate::domain::types::{
    BookRatingStats, Rating, RatingPatch, RatingSortBy, RatingUpsert, TopRatedBook,
};
use crate::error::SocialServiceError;

pub const DEFAULT_TOP_RATED_COUNT: u64 = 5;
pub const MAX_TOP_RATED_COUNT: u64 = 20;

/// Resolve a score given either on the 0–10 scale or as 0–5 stars.
fn resolve_score(
    rating: Option<i32>,
    stars: Option<i32>,
) -> Result<Option<i32>, SocialServiceError> {
    match (rating, stars) {
        (Some(_), Some(_)) => Err(SocialServiceError::InvalidRating),
        (Some(rating), None) => Ok(Some(rating)),
        (None, Some(stars)) => Ok(Some(from_five_star(stars)?)),
        (None, None) => Ok(None),
    }
}

/// Blank reviews are stored as absent.
fn normalize_review(review: Option<String>) -> Option<String> {
    review
        .map(|r| r.trim().to_owned())
        .filter(|r| !r.is_empty())
}

// ── UpsertRating ─────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct UpsertRatingInput {
    pub book_id: i32,
    /// 0–10.
    pub rating: Option<i32>,
    /// 0–5, doubled onto the 0–10 scale. Mutually exclusive with `rating`.
    pub stars: Option<i32>,
    pub review: Option<String>,
    /// Defaults to `finished_reading`.
    pub status: Option<ReadingStatus>,
}

pub struct UpsertRatingUseCase<R: RatingRepository, C: ResponseCache> {
    pub repo: R,
    pub cache: C,
}

impl<R: RatingRepository, C: ResponseCache> UpsertRatingUseCase<R, C> {
    pub async fn execute(
        &self,
        user_id: i32,
        input: UpsertRatingInput,
    ) -> Result<Rating, SocialServiceError> {
        let status = input.status.unwrap_or_default();
        let score = resolve_score(input.rating, input.stars)?.unwrap_or(0);
        let score = validate_score(status, score)?;

        let rating = self
            .repo
            .upsert(&RatingUpsert {
                user_id,
                book_id: input.book_id,
                rating: score,
                review: normalize_review(input.review),
                status,
            })
            .await?;

        tracing::info!(
            rating_id = rating.id,
            user_id,
            book_id = rating.book_id,
            "rating upserted"
        );
        self.cache
            .invalidate_all(&rating_write_patterns(rating.book_id, user_id))
            .await;
        Ok(rating)
    }
}

// ── GetBookRatings ───────────────────────────────────────────────────────────

pub struct GetBookRatingsUseCase<R: RatingRepository> {
    pub repo: R,
}

impl<R: RatingRepository> GetBookRatingsUseCase<R> {
    pub async fn execute(
        &self,
        book_id: i32,
        viewer_id: Option<i32>,
        sort_by: RatingSortBy,
    ) -> Result<BookRatingStats, SocialServiceError> {
        self.repo.find_by_book(book_id, viewer_id, sort_by).await
    }
}

// ── GetMyRating ──────────────────────────────────────────────────────────────

pub struct GetMyRatingUseCase<R: RatingRepository> {
    pub repo: R,
}

impl<R: RatingRepository> GetMyRatingUseCase<R> {
    pub async fn execute(&self, user_id: i32, book_id: i32) -> Result<Rating, SocialServiceError> {
        self.repo
            .find_by_user_and_book(user_id, book_id)
            .await?
            .ok_or(SocialServiceError::RatingNotFound)
    }
}

// ── ListMyRatings ────────────────────────────────────────────────────────────

pub struct ListMyRatingsUseCase<R: RatingRepository> {
    pub repo: R,
}

impl<R: RatingRepository> ListMyRatingsUseCase<R> {
    pub async fn execute(
        &self,
        user_id: i32,
        status: Option<ReadingStatus>,
    ) -> Result<Vec<Rating>, SocialServiceError> {
        self.repo.list_by_user(user_id, status).await
    }
}

// ── UpdateRating ─────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct UpdateRatingInput {
    pub rating: Option<i32>,
    pub stars: Option<i32>,
    pub review: Option<String>,
}

pub struct UpdateRatingUseCase<R: RatingRepository, C: ResponseCache> {
    pub repo: R,
    pub cache: C,
}

impl<R: RatingRepository, C: ResponseCache> UpdateRatingUseCase<R, C> {
    /// Another user's rating is reported as missing. Only supplied fields are
    /// written, so concurrent edits to the other field are kept.
    pub async fn execute(
        &self,
        user_id: i32,
        rating_id: i32,
        input: UpdateRatingInput,
    ) -> Result<Rating, SocialServiceError> {
        let patch = RatingPatch {
            rating: resolve_score(input.rating, input.stars)?,
            review: input.review.map(|review| normalize_review(Some(review))),
        };
        if patch.is_empty() {
            return Err(SocialServiceError::MissingData);
        }

        let existing = self
            .repo
            .find_by_id(rating_id)
            .await?
            .filter(|r| r.user_id == user_id)
            .ok_or(SocialServiceError::RatingNotFound)?;

        if let Some(score) = patch.rating {
            validate_score(existing.status, score)?;
        }

        let updated = self
            .repo
            .update(rating_id, user_id, &patch)
            .await?
            .ok_or(SocialServiceError::RatingNotFound)?;

        self.cache
            .invalidate_all(&rating_write_patterns(updated.book_id, user_id))
            .await;
        Ok(updated)
    }
}

// ── DeleteRating ─────────────────────────────────────────────────────────────

pub struct DeleteRatingUseCase<R: RatingRepository, C: ResponseCache> {
    pub repo: R,
    pub cache: C,
}

impl<R: RatingRepository, C: ResponseCache> DeleteRatingUseCase<R, C> {
    pub async fn execute(&self, user_id: i32, book_id: i32) -> Result<(), SocialServiceError> {
        let deleted = self.repo.delete(user_id, book_id).await?;
        if !deleted {
            return Err(SocialServiceError::RatingNotFound);
        }
        self.cache
            .invalidate_all(&rating_write_patterns(book_id, user_id))
            .await;
        Ok(())
    }
}

// ── LikeRating / UnlikeRating ────────────────────────────────────────────────

pub struct LikeRatingUseCase<R: RatingRepository, C: ResponseCache> {
    pub repo: R,
    pub cache: C,
}

impl<R: RatingRepository, C: ResponseCache> LikeRatingUseCase<R, C> {
    pub async fn execute(&self, user_id: i32, rating_id: i32) -> Result<(), SocialServiceError> {
        let rating = self
            .repo
            .find_by_id(rating_id)
            .await?
            .ok_or(SocialServiceError::RatingNotFound)?;
        self.repo.like(user_id, rating_id).await?;
        self.cache
            .invalidate_all(&engagement_patterns(rating.book_id))
            .await;
        Ok(())
    }
}

pub struct UnlikeRatingUseCase<R: RatingRepository, C: ResponseCache> {
    pub repo: R,
    pub cache: C,
}

impl<R: RatingRepository, C: ResponseCache> UnlikeRatingUseCase<R, C> {
    pub async fn execute(&self, user_id: i32, rating_id: i32) -> Result<(), SocialServiceError> {
        let rating = self
            .repo
            .find_by_id(rating_id)
            .await?
            .ok_or(SocialServiceError::LikeNotFound)?;
        let removed = self.repo.unlike(user_id, rating_id).await?;
        if !removed {
            return Err(SocialServiceError::LikeNotFound);
        }
        self.cache
            .invalidate_all(&engagement_patterns(rating.book_id))
            .await;
        Ok(())
    }
}

// ── GetTopRated ──────────────────────────────────────────────────────────────

pub struct GetTopRatedUseCase<R: RatingRepository> {
    pub repo: R,
}

impl<R: RatingRepository> GetTopRatedUseCase<R> {
    pub async fn execute(
        &self,
        user_id: i32,
        count: Option<u64>,
    ) -> Result<Vec<TopRatedBook>, SocialServiceError> {
        let count = count
            .unwrap_or(DEFAULT_TOP_RATED_COUNT)
            .clamp(1, MAX_TOP_RATED_COUNT);
        self.repo.top_rated_by_user(user_id, count).await
    }
}
