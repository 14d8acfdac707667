use deadpool_redis::Pool as RedisPool;
use sea_orm::DatabaseConnection;

use crate::infra::cache::RedisResponseCache;
use crate::infra::db::{
    DbCommentRepository, DbFeedRepository, DbFollowRepository, DbRankingRepository,
    DbRatingRepository, DbStatsRepository,
};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    /// `None` disables the response cache.
    pub redis: Option<RedisPool>,
}

impl AppState {
    pub fn rating_repo(&self) -> DbRatingRepository {
        DbRatingRepository {
            db: self.db.clone(),
        }
    }

    pub fn comment_repo(&self) -> DbCommentRepository {
        DbCommentRepository {
            db: self.db.clone(),
        }
    }

    pub fn follow_repo(&self) -> DbFollowRepository {
        DbFollowRepository {
            db: self.db.clone(),
        }
    }

    pub fn feed_repo(&self) -> DbFeedRepository {
        DbFeedRepository {
            db: self.db.clone(),
        }
    }

    pub fn ranking_repo(&self) -> DbRankingRepository {
        DbRankingRepository {
            db: self.db.clone(),
        }
    }

    pub fn stats_repo(&self) -> DbStatsRepository {
        DbStatsRepository {
            db: self.db.clone(),
        }
    }

    pub fn response_cache(&self) -> RedisResponseCache {
        RedisResponseCache {
            pool: self.redis.clone(),
        }
    }
}
