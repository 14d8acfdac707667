use crate::domain::cache::follow_patterns;
use crate::domain::repository::{FollowRepository, ResponseCache};
use crate::domain::types::{FollowStats, UserSummary};
use crate::error::SocialServiceError;

// ── Follow / Unfollow ────────────────────────────────────────────────────────

pub struct FollowUserUseCase<F: FollowRepository, K: ResponseCache> {
    pub follows: F,
    pub cache: K,
}

impl<F: FollowRepository, K: ResponseCache> FollowUserUseCase<F, K> {
    pub async fn execute(
        &self,
        follower_id: i32,
        following_id: i32,
    ) -> Result<(), SocialServiceError> {
        if follower_id == following_id {
            return Err(SocialServiceError::CannotFollowSelf);
        }
        let created = self.follows.follow(follower_id, following_id).await?;
        if !created {
            return Err(SocialServiceError::AlreadyFollowing);
        }
        self.cache.invalidate_all(&follow_patterns(follower_id)).await;
        Ok(())
    }
}

pub struct UnfollowUserUseCase<F: FollowRepository, K: ResponseCache> {
    pub follows: F,
    pub cache: K,
}

impl<F: FollowRepository, K: ResponseCache> UnfollowUserUseCase<F, K> {
    pub async fn execute(
        &self,
        follower_id: i32,
        following_id: i32,
    ) -> Result<(), SocialServiceError> {
        let removed = self.follows.unfollow(follower_id, following_id).await?;
        if !removed {
            return Err(SocialServiceError::FollowNotFound);
        }
        self.cache.invalidate_all(&follow_patterns(follower_id)).await;
        Ok(())
    }
}

// ── Followers / Following ────────────────────────────────────────────────────

pub struct ListFollowersUseCase<F: FollowRepository> {
    pub follows: F,
}

impl<F: FollowRepository> ListFollowersUseCase<F> {
    pub async fn execute(&self, user_id: i32) -> Result<Vec<UserSummary>, SocialServiceError> {
        self.follows.followers(user_id).await
    }
}

pub struct ListFollowingUseCase<F: FollowRepository> {
    pub follows: F,
}

impl<F: FollowRepository> ListFollowingUseCase<F> {
    pub async fn execute(&self, user_id: i32) -> Result<Vec<UserSummary>, SocialServiceError> {
        self.follows.following(user_id).await
    }
}

// ── FollowStats ──────────────────────────────────────────────────────────────

pub struct GetFollowStatsUseCase<F: FollowRepository> {
    pub follows: F,
}

impl<F: FollowRepository> GetFollowStatsUseCase<F> {
    pub async fn execute(
        &self,
        user_id: i32,
        viewer_id: Option<i32>,
    ) -> Result<FollowStats, SocialServiceError> {
        let (followers, following) = self.follows.counts(user_id).await?;
        let is_following = match viewer_id {
            Some(viewer) if viewer != user_id => {
                self.follows.is_following(viewer, user_id).await?
            }
            _ => false,
        };
        Ok(FollowStats {
            followers,
            following,
            is_following,
        })
    }
}
