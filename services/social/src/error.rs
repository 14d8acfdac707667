use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Social service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum SocialServiceError {
    #[error("invalid rating")]
    InvalidRating,
    #[error("invalid status")]
    InvalidStatus,
    #[error("invalid sort by")]
    InvalidSortBy,
    #[error("invalid feed type")]
    InvalidFeedType,
    #[error("invalid id")]
    InvalidId,
    #[error("invalid year")]
    InvalidYear,
    #[error("missing data")]
    MissingData,
    #[error("invalid comment")]
    InvalidComment,
    #[error("cannot follow self")]
    CannotFollowSelf,
    #[error("rating not found")]
    RatingNotFound,
    #[error("like not found")]
    LikeNotFound,
    #[error("comment not found")]
    CommentNotFound,
    #[error("follow not found")]
    FollowNotFound,
    #[error("already following")]
    AlreadyFollowing,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl SocialServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRating => "INVALID_RATING",
            Self::InvalidStatus => "INVALID_STATUS",
            Self::InvalidSortBy => "INVALID_SORT_BY",
            Self::InvalidFeedType => "INVALID_FEED_TYPE",
            Self::InvalidId => "INVALID_ID",
            Self::InvalidYear => "INVALID_YEAR",
            Self::MissingData => "MISSING_DATA",
            Self::InvalidComment => "INVALID_COMMENT",
            Self::CannotFollowSelf => "CANNOT_FOLLOW_SELF",
            Self::RatingNotFound => "RATING_NOT_FOUND",
            Self::LikeNotFound => "LIKE_NOT_FOUND",
            Self::CommentNotFound => "COMMENT_NOT_FOUND",
            Self::FollowNotFound => "FOLLOW_NOT_FOUND",
            Self::AlreadyFollowing => "ALREADY_FOLLOWING",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl From<bookmarkd_domain::rating::ScoreError> for SocialServiceError {
    fn from(_: bookmarkd_domain::rating::ScoreError) -> Self {
        Self::InvalidRating
    }
}

impl From<bookmarkd_domain::id::IdParseError> for SocialServiceError {
    fn from(_: bookmarkd_domain::id::IdParseError) -> Self {
        Self::InvalidId
    }
}

impl IntoResponse for SocialServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidRating
            | Self::InvalidStatus
            | Self::InvalidSortBy
            | Self::InvalidFeedType
            | Self::InvalidId
            | Self::InvalidYear
            | Self::MissingData
            | Self::InvalidComment
            | Self::CannotFollowSelf => StatusCode::BAD_REQUEST,
            Self::RatingNotFound
            | Self::LikeNotFound
            | Self::CommentNotFound
            | Self::FollowNotFound => StatusCode::NOT_FOUND,
            Self::AlreadyFollowing => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
