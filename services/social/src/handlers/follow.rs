use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

use bookmarkd_auth_types::identity::{IdentityHeaders, OptionalIdentity};
use bookmarkd_domain::id::UserId;

use crate::domain::types::{FollowStats, UserSummary};
use crate::error::SocialServiceError;
use crate::state::AppState;
use crate::usecase::follow::{
    FollowUserUseCase, GetFollowStatsUseCase, ListFollowersUseCase, ListFollowingUseCase,
    UnfollowUserUseCase,
};

#[derive(Serialize)]
pub struct UserSummaryResponse {
    pub id: i32,
    pub username: String,
    #[serde(serialize_with = "bookmarkd_core::serde::to_rfc3339_ms")]
    pub followed_at: chrono::DateTime<chrono::Utc>,
}

impl From<UserSummary> for UserSummaryResponse {
    fn from(u: UserSummary) -> Self {
        Self {
            id: u.id,
            username: u.username,
            followed_at: u.followed_at,
        }
    }
}

#[derive(Serialize)]
pub struct FollowStatsResponse {
    pub followers: i64,
    pub following: i64,
    pub is_following: bool,
}

impl From<FollowStats> for FollowStatsResponse {
    fn from(s: FollowStats) -> Self {
        Self {
            followers: s.followers,
            following: s.following,
            is_following: s.is_following,
        }
    }
}

// ── POST /users/{user_id}/follow ─────────────────────────────────────────────

pub async fn follow_user(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, SocialServiceError> {
    let user_id: UserId = user_id.parse()?;
    let usecase = FollowUserUseCase {
        follows: state.follow_repo(),
        cache: state.response_cache(),
    };
    usecase.execute(identity.user_id, user_id.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /users/{user_id}/follow ───────────────────────────────────────────

pub async fn unfollow_user(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, SocialServiceError> {
    let user_id: UserId = user_id.parse()?;
    let usecase = UnfollowUserUseCase {
        follows: state.follow_repo(),
        cache: state.response_cache(),
    };
    usecase.execute(identity.user_id, user_id.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /users/{user_id}/followers ───────────────────────────────────────────

pub async fn list_followers(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<UserSummaryResponse>>, SocialServiceError> {
    let user_id: UserId = user_id.parse()?;
    let usecase = ListFollowersUseCase {
        follows: state.follow_repo(),
    };
    let users = usecase.execute(user_id.into()).await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

// ── GET /users/{user_id}/following ───────────────────────────────────────────

pub async fn list_following(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<UserSummaryResponse>>, SocialServiceError> {
    let user_id: UserId = user_id.parse()?;
    let usecase = ListFollowingUseCase {
        follows: state.follow_repo(),
    };
    let users = usecase.execute(user_id.into()).await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

// ── GET /users/{user_id}/follow-stats ────────────────────────────────────────

pub async fn get_follow_stats(
    viewer: OptionalIdentity,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<FollowStatsResponse>, SocialServiceError> {
    let user_id: UserId = user_id.parse()?;
    let usecase = GetFollowStatsUseCase {
        follows: state.follow_repo(),
    };
    let stats = usecase.execute(user_id.into(), viewer.user_id()).await?;
    Ok(Json(stats.into()))
}
