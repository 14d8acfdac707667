pub mod comment;
pub mod feed;
pub mod follow;
pub mod ranking;
pub mod rating;
pub mod stats;
