//! Mock auth helpers for tests.
//!
//! Services behind the gateway receive `x-bookmarkd-user-id` injected by the
//! gateway. In tests, `MockAuth` produces that header directly so no real
//! gateway or token is needed.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use bookmarkd_auth_types::identity::USER_ID_HEADER;

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: i32,
}

impl MockAuth {
    pub fn new(user_id: i32) -> Self {
        Self { user_id }
    }

    pub fn header_name() -> HeaderName {
        HeaderName::from_static(USER_ID_HEADER)
    }

    pub fn header_value(&self) -> HeaderValue {
        HeaderValue::from(self.user_id)
    }

    /// Return headers as if the gateway injected them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(Self::header_name(), self.header_value());
        map
    }
}
