use anyhow::Context as _;
use deadpool_redis::Pool;
use glob::Pattern;
use deadpool_redis::redis::{AsyncCommands, RedisError, cmd};

use crate::domain::repository::ResponseCache;
use crate::error::SocialServiceError;

const SCAN_BATCH: usize = 200;
/// Every cached response lives under this prefix.
const CACHE_NAMESPACE: &str = "cache:*";

/// Redis-backed response cache. With no pool configured every call is a no-op miss.
#[derive(Clone)]
pub struct RedisResponseCache {
    pub pool: Option<Pool>,
}

impl RedisResponseCache {
    async fn conn(&self) -> Result<Option<deadpool_redis::Connection>, SocialServiceError> {
        let Some(pool) = &self.pool else {
            return Ok(None);
        };
        let conn = pool
            .get()
            .await
            .map_err(|e| SocialServiceError::Internal(e.into()))?;
        Ok(Some(conn))
    }
}

impl ResponseCache for RedisResponseCache {
    fn enabled(&self) -> bool {
        self.pool.is_some()
    }

    async fn get(&self, key: &str) -> Result<Option<String>, SocialServiceError> {
        let Some(mut conn) = self.conn().await? else {
            return Ok(None);
        };
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e: RedisError| SocialServiceError::Internal(e.into()))?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), SocialServiceError> {
        let Some(mut conn) = self.conn().await? else {
            return Ok(());
        };
        let (): () = conn
            .set_ex(key, value, ttl_secs)
            .await
            .map_err(|e: RedisError| SocialServiceError::Internal(e.into()))?;
        Ok(())
    }

    /// One `SCAN` pass over the cache namespace, deleting keys that match any pattern.
    async fn invalidate(&self, patterns: &[String]) -> Result<(), SocialServiceError> {
        if patterns.is_empty() {
            return Ok(());
        }
        let Some(mut conn) = self.conn().await? else {
            return Ok(());
        };
        let patterns = compile_patterns(patterns)?;
        let mut cursor: u64 = 0;
        loop {
            let (next, keys): (u64, Vec<String>) = cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(CACHE_NAMESPACE)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e: RedisError| SocialServiceError::Internal(e.into()))?;
            let stale: Vec<String> = keys
                .into_iter()
                .filter(|key| matches_any(&patterns, key))
                .collect();
            if !stale.is_empty() {
                let (): () = conn
                    .del(&stale)
                    .await
                    .map_err(|e: RedisError| SocialServiceError::Internal(e.into()))?;
            }
            if next == 0 {
                break;
            }
            cursor = next;
        }
        Ok(())
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>, SocialServiceError> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p)
                .with_context(|| format!("invalid cache pattern {p:?}"))
                .map_err(SocialServiceError::from)
        })
        .collect()
}

fn matches_any(patterns: &[Pattern], key: &str) -> bool {
    patterns.iter().any(|p| p.matches(key))
}
