use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use bookmarkd_auth_types::identity::IdentityHeaders;
use bookmarkd_domain::id::{CommentId, RatingId};

use crate::domain::types::{Comment, CommentWithUser};
use crate::error::SocialServiceError;
use crate::state::AppState;
use crate::usecase::comment::{CreateCommentUseCase, DeleteCommentUseCase, ListCommentsUseCase};

#[derive(Serialize)]
pub struct CommentResponse {
    pub id: i32,
    pub user_id: i32,
    pub rating_id: i32,
    pub text: String,
    #[serde(serialize_with = "bookmarkd_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl From<Comment> for CommentResponse {
    fn from(c: Comment) -> Self {
        Self {
            id: c.id,
            user_id: c.user_id,
            rating_id: c.rating_id,
            text: c.text,
            created_at: c.created_at,
            username: None,
        }
    }
}

impl From<CommentWithUser> for CommentResponse {
    fn from(c: CommentWithUser) -> Self {
        Self {
            username: Some(c.username),
            ..CommentResponse::from(c.comment)
        }
    }
}

#[derive(Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
}

// ── GET /ratings/{rating_id}/comments ────────────────────────────────────────

pub async fn list_comments(
    State(state): State<AppState>,
    Path(rating_id): Path<String>,
) -> Result<Json<Vec<CommentResponse>>, SocialServiceError> {
    let rating_id: RatingId = rating_id.parse()?;
    let usecase = ListCommentsUseCase {
        comments: state.comment_repo(),
    };
    let comments = usecase.execute(rating_id.into()).await?;
    Ok(Json(comments.into_iter().map(Into::into).collect()))
}

// ── POST /ratings/{rating_id}/comments ───────────────────────────────────────

pub async fn create_comment(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(rating_id): Path<String>,
    Json(body): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), SocialServiceError> {
    let rating_id: RatingId = rating_id.parse()?;
    let usecase = CreateCommentUseCase {
        comments: state.comment_repo(),
        ratings: state.rating_repo(),
        cache: state.response_cache(),
    };
    let comment = usecase
        .execute(identity.user_id, rating_id.into(), &body.text)
        .await?;
    Ok((StatusCode::CREATED, Json(comment.into())))
}

// ── DELETE /comments/{comment_id} ────────────────────────────────────────────

pub async fn delete_comment(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> Result<StatusCode, SocialServiceError> {
    let comment_id: CommentId = comment_id.parse()?;
    let usecase = DeleteCommentUseCase {
        comments: state.comment_repo(),
        cache: state.response_cache(),
    };
    usecase.execute(identity.user_id, comment_id.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}
