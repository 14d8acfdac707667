mod helpers;

mod comment_test;
mod feed_test;
mod follow_test;
mod ranking_test;
mod rating_test;
mod stats_test;
