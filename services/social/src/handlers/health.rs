use axum::extract::State;
use axum::http::StatusCode;

use bookmarkd_core::health::readiness;

use crate::state::AppState;

/// Handler for `GET /readyz`: pings the database.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    readiness(state.db.ping().await)
}
