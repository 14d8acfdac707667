//! Response cache key and TTL policy.
//!
//! Keys are `cache:global:{path}[?{query}]` for responses that do not depend on
//! the viewer, and `cache:user:{viewer}:{path}[?{query}]` for those that do.

pub const TTL_RANKINGS_SECS: u64 = 60 * 60;
pub const TTL_BOOK_RATINGS_SECS: u64 = 60 * 60;
pub const TTL_FEED_SECS: u64 = 15 * 60;
pub const TTL_USER_STATS_SECS: u64 = 30 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheScope {
    /// Same response for every caller.
    Global,
    /// Response carries viewer-specific fields (e.g. `liked_by_viewer`).
    Viewer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub scope: CacheScope,
    pub ttl_secs: u64,
}

impl CachePolicy {
    const fn global(ttl_secs: u64) -> Self {
        Self {
            scope: CacheScope::Global,
            ttl_secs,
        }
    }

    const fn viewer(ttl_secs: u64) -> Self {
        Self {
            scope: CacheScope::Viewer,
            ttl_secs,
        }
    }
}

/// Cache policy for a GET path, or `None` when the route is never cached.
pub fn policy_for(path: &str) -> Option<CachePolicy> {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    match segments.as_slice() {
        ["books", "trending"] | ["books", "popular"] => {
            Some(CachePolicy::global(TTL_RANKINGS_SECS))
        }
        ["books", _, "similar"] => Some(CachePolicy::global(TTL_RANKINGS_SECS)),
        ["books", _, "ratings"] => Some(CachePolicy::viewer(TTL_BOOK_RATINGS_SECS)),
        ["feed"] => Some(CachePolicy::viewer(TTL_FEED_SECS)),
        ["users", user, "stats", "year", _] | ["users", user, "top-rated"] if *user != "@me" => {
            Some(CachePolicy::global(TTL_USER_STATS_SECS))
        }
        _ => None,
    }
}

pub fn cache_key(
    scope: CacheScope,
    viewer_id: Option<i32>,
    path: &str,
    query: Option<&str>,
) -> String {
    let target = match query {
        Some(q) if !q.is_empty() => format!("{path}?{q}"),
        _ => path.to_owned(),
    };
    match (scope, viewer_id) {
        (CacheScope::Viewer, Some(viewer)) => format!("cache:user:{viewer}:{target}"),
        _ => format!("cache:global:{target}"),
    }
}

// ── Invalidation patterns ────────────────────────────────────────────────────

/// A rating was created, changed or removed.
pub fn rating_write_patterns(book_id: i32, user_id: i32) -> Vec<String> {
    vec![
        format!("cache:*:/books/{book_id}/ratings*"),
        "cache:global:/books/trending*".to_owned(),
        "cache:global:/books/popular*".to_owned(),
        "cache:global:/books/*/similar*".to_owned(),
        "cache:*:/feed*".to_owned(),
        format!("cache:global:/users/{user_id}/*"),
    ]
}

/// Like counts or comment counts of ratings on one book changed.
pub fn engagement_patterns(book_id: i32) -> Vec<String> {
    vec![
        format!("cache:*:/books/{book_id}/ratings*"),
        "cache:*:/feed*".to_owned(),
    ]
}

/// A comment was removed from an unknown book's rating.
pub fn comment_removed_patterns() -> Vec<String> {
    vec![
        "cache:*:/books/*/ratings*".to_owned(),
        "cache:*:/feed*".to_owned(),
    ]
}

/// The follower's following feed changed.
pub fn follow_patterns(follower_id: i32) -> Vec<String> {
    vec![format!("cache:user:{follower_id}:/feed*")]
}
