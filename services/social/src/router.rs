use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};
use tower_http::trace::TraceLayer;

use bookmarkd_core::health::healthz;
use bookmarkd_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    cache::response_cache,
    comment::{create_comment, delete_comment, list_comments},
    feed::get_feed,
    follow::{follow_user, get_follow_stats, list_followers, list_following, unfollow_user},
    health::readyz,
    ranking::{get_popular, get_similar, get_trending},
    rating::{
        delete_rating, get_book_ratings, get_my_rating, get_my_ratings, get_top_rated,
        like_rating, unlike_rating, update_rating, upsert_rating,
    },
    stats::get_year_stats,
};
use crate::infra::cache::RedisResponseCache;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Ratings
        .route("/books/{book_id}/ratings", post(upsert_rating))
        .route("/books/{book_id}/ratings", get(get_book_ratings))
        .route("/books/{book_id}/ratings", delete(delete_rating))
        .route("/books/{book_id}/ratings/me", get(get_my_rating))
        .route("/ratings/{rating_id}", patch(update_rating))
        .route("/users/@me/ratings", get(get_my_ratings))
        .route("/users/{user_id}/top-rated", get(get_top_rated))
        // Likes
        .route("/ratings/{rating_id}/like", post(like_rating))
        .route("/ratings/{rating_id}/like", delete(unlike_rating))
        // Comments
        .route("/ratings/{rating_id}/comments", get(list_comments))
        .route("/ratings/{rating_id}/comments", post(create_comment))
        .route("/comments/{comment_id}", delete(delete_comment))
        // Feed
        .route("/feed", get(get_feed))
        // Rankings
        .route("/books/trending", get(get_trending))
        .route("/books/popular", get(get_popular))
        .route("/books/{book_id}/similar", get(get_similar))
        // Stats
        .route("/users/{user_id}/stats/year/{year}", get(get_year_stats))
        // Follows
        .route("/users/{user_id}/follow", post(follow_user))
        .route("/users/{user_id}/follow", delete(unfollow_user))
        .route("/users/{user_id}/followers", get(list_followers))
        .route("/users/{user_id}/following", get(list_following))
        .route("/users/{user_id}/follow-stats", get(get_follow_stats))
        .layer(middleware::from_fn_with_state(
            state.response_cache(),
            response_cache::<RedisResponseCache>,
        ))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
