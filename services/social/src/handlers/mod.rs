pub mod cache;
pub mod comment;
pub mod feed;
pub mod follow;
pub mod health;
pub mod ranking;
pub mod rating;
pub mod stats;
