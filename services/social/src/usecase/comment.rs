use crate::domain::cache::{comment_removed_patterns, engagement_patterns};
use crate::domain::repository::{CommentRepository, RatingRepository, ResponseCache};
use crate::domain::types::{Comment, CommentWithUser, MAX_COMMENT_CHARS};
use crate::error::SocialServiceError;

// ── CreateComment ────────────────────────────────────────────────────────────

pub struct CreateCommentUseCase<C: CommentRepository, R: RatingRepository, K: ResponseCache> {
    pub comments: C,
    pub ratings: R,
    pub cache: K,
}

impl<C: CommentRepository, R: RatingRepository, K: ResponseCache> CreateCommentUseCase<C, R, K> {
    pub async fn execute(
        &self,
        user_id: i32,
        rating_id: i32,
        text: &str,
    ) -> Result<Comment, SocialServiceError> {
        let text = text.trim();
        let len = text.chars().count();
        if len == 0 || len > MAX_COMMENT_CHARS {
            return Err(SocialServiceError::InvalidComment);
        }

        let rating = self
            .ratings
            .find_by_id(rating_id)
            .await?
            .ok_or(SocialServiceError::RatingNotFound)?;
        let comment = self.comments.create(user_id, rating_id, text).await?;

        self.cache
            .invalidate_all(&engagement_patterns(rating.book_id))
            .await;
        Ok(comment)
    }
}

// ── ListComments ─────────────────────────────────────────────────────────────

pub struct ListCommentsUseCase<C: CommentRepository> {
    pub comments: C,
}

impl<C: CommentRepository> ListCommentsUseCase<C> {
    pub async fn execute(
        &self,
        rating_id: i32,
    ) -> Result<Vec<CommentWithUser>, SocialServiceError> {
        self.comments.list_by_rating(rating_id).await
    }
}

// ── DeleteComment ────────────────────────────────────────────────────────────

pub struct DeleteCommentUseCase<C: CommentRepository, K: ResponseCache> {
    pub comments: C,
    pub cache: K,
}

impl<C: CommentRepository, K: ResponseCache> DeleteCommentUseCase<C, K> {
    /// Someone else's comment is reported as missing.
    pub async fn execute(&self, user_id: i32, comment_id: i32) -> Result<(), SocialServiceError> {
        let deleted = self.comments.delete(comment_id, user_id).await?;
        if !deleted {
            return Err(SocialServiceError::CommentNotFound);
        }
        self.cache.invalidate_all(&comment_removed_patterns()).await;
        Ok(())
    }
}
