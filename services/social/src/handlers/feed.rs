use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use bookmarkd_auth_types::identity::OptionalIdentity;
use bookmarkd_domain::pagination::OffsetPage;

use crate::domain::types::{FeedItem, FeedType};
use crate::error::SocialServiceError;
use crate::handlers::ranking::BookResponse;
use crate::handlers::rating::RatingResponse;
use crate::state::AppState;
use crate::usecase::feed::GetFeedUseCase;

#[derive(Serialize)]
pub struct FeedItemResponse {
    #[serde(flatten)]
    pub rating: RatingResponse,
    pub username: String,
    pub book: BookResponse,
    pub like_count: i64,
    pub comment_count: i64,
    pub liked_by_viewer: bool,
}

impl From<FeedItem> for FeedItemResponse {
    fn from(item: FeedItem) -> Self {
        Self {
            rating: item.rating.into(),
            username: item.username,
            book: item.book.into(),
            like_count: item.like_count,
            comment_count: item.comment_count,
            liked_by_viewer: item.liked_by_viewer,
        }
    }
}

#[derive(Deserialize, Default)]
pub struct FeedQuery {
    #[serde(rename = "type")]
    pub feed_type: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Handler for `GET /feed`.
pub async fn get_feed(
    viewer: OptionalIdentity,
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<FeedItemResponse>>, SocialServiceError> {
    let feed_type = match query.feed_type.as_deref() {
        None | Some("") => FeedType::default(),
        Some(raw) => FeedType::from_snake_case(raw).ok_or(SocialServiceError::InvalidFeedType)?,
    };
    let defaults = OffsetPage::default();
    let page = OffsetPage {
        limit: query.limit.unwrap_or(defaults.limit),
        offset: query.offset.unwrap_or(defaults.offset),
    };

    let usecase = GetFeedUseCase {
        repo: state.feed_repo(),
    };
    let items = usecase.execute(viewer.user_id(), feed_type, page).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}
