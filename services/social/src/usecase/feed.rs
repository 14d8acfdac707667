use bookmarkd_domain::pagination::OffsetPage;

use crate::domain::repository::FeedRepository;
use crate::domain::types::{FeedItem, FeedType};
use crate::error::SocialServiceError;

pub struct GetFeedUseCase<R: FeedRepository> {
    pub repo: R,
}

impl<R: FeedRepository> GetFeedUseCase<R> {
    /// A following feed requested anonymously is served as the global feed.
    pub async fn execute(
        &self,
        viewer_id: Option<i32>,
        feed_type: FeedType,
        page: OffsetPage,
    ) -> Result<Vec<FeedItem>, SocialServiceError> {
        let following_only = match (feed_type, viewer_id) {
            (FeedType::Following, Some(_)) => true,
            (FeedType::Following, None) => {
                tracing::debug!("following feed without viewer, serving global feed");
                false
            }
            (FeedType::All, _) => false,
        };
        self.repo
            .feed(viewer_id, following_only, page.clamped())
            .await
    }
}
