//! Offset pagination.

use serde::{Deserialize, Serialize};

/// Offset/limit window over an ordered result set.
///
/// - `limit`: 1–100, default 20
/// - `offset`: ≥ 0, default 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetPage {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

fn default_limit() -> u32 {
    20
}

impl Default for OffsetPage {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl OffsetPage {
    pub const MAX_LIMIT: u32 = 100;

    /// Clamp `limit` to 1–100.
    ///
    /// Call at the request boundary; the stores take the window as given.
    pub fn clamped(self) -> Self {
        Self {
            limit: self.limit.clamp(1, Self::MAX_LIMIT),
            offset: self.offset,
        }
    }

    /// The window immediately after this one.
    pub fn next(self) -> Self {
        Self {
            limit: self.limit,
            offset: self.offset.saturating_add(self.limit),
        }
    }
}
