use chrono::{DateTime, Datelike, NaiveDate, Utc};

use bookmarkd_domain::rating::ReadingStatus;

/// Length in characters after which review snippets are cut.
pub const REVIEW_SNIPPET_CHARS: usize = 150;

/// How many genres/authors the year stats keep.
pub const YEAR_STATS_TOP_N: u64 = 5;

/// One user's rating/shelf entry for one book.
#[derive(Debug, Clone, PartialEq)]
pub struct Rating {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub rating: i32,
    pub review: Option<String>,
    pub status: ReadingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields written by an upsert, keyed on `(user_id, book_id)`.
#[derive(Debug, Clone)]
pub struct RatingUpsert {
    pub user_id: i32,
    pub book_id: i32,
    pub rating: i32,
    pub review: Option<String>,
    pub status: ReadingStatus,
}

/// Partial update of a rating. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingPatch {
    pub rating: Option<i32>,
    /// `Some(None)` clears the review.
    pub review: Option<Option<String>>,
}

impl RatingPatch {
    pub fn is_empty(&self) -> bool {
        self.rating.is_none() && self.review.is_none()
    }
}

/// A rating joined with its author and like/comment aggregates.
#[derive(Debug, Clone)]
pub struct RatingWithSocial {
    pub rating: Rating,
    pub username: String,
    pub like_count: i64,
    pub comment_count: i64,
    /// Always `false` for anonymous viewers.
    pub liked_by_viewer: bool,
}

#[derive(Debug, Clone)]
pub struct BookRatingStats {
    /// `0.0` when the book has no ratings.
    pub average_rating: f64,
    pub total_ratings: i64,
    pub ratings: Vec<RatingWithSocial>,
}

/// Sort options for a book's rating list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RatingSortBy {
    #[default]
    Newest,
    MostLiked,
    HighestRating,
}

impl RatingSortBy {
    pub fn from_snake_case(s: &str) -> Option<Self> {
        match s {
            "newest" => Some(Self::Newest),
            "most_liked" => Some(Self::MostLiked),
            "highest_rating" => Some(Self::HighestRating),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FeedType {
    #[default]
    All,
    Following,
}

impl FeedType {
    pub fn from_snake_case(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Self::All),
            "following" => Some(Self::Following),
            _ => None,
        }
    }
}

/// Book columns carried along by feed items and rankings.
#[derive(Debug, Clone, PartialEq)]
pub struct BookSummary {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub cover_url: Option<String>,
}

/// Read-only projection of one rating event in the activity feed.
#[derive(Debug, Clone)]
pub struct FeedItem {
    pub rating: Rating,
    pub username: String,
    pub book: BookSummary,
    pub like_count: i64,
    pub comment_count: i64,
    pub liked_by_viewer: bool,
}

#[derive(Debug, Clone)]
pub struct TrendingBook {
    pub book: BookSummary,
    pub rating_count: i64,
    pub average_rating: f64,
}

#[derive(Debug, Clone)]
pub struct PopularBook {
    pub book: BookSummary,
    pub average_rating: f64,
    pub rating_count: i64,
}

#[derive(Debug, Clone)]
pub struct SimilarBook {
    pub book: BookSummary,
    /// Distinct users who liked both the reference book and this one.
    pub common_users: i64,
    pub average_rating: f64,
}

#[derive(Debug, Clone)]
pub struct TopRatedBook {
    pub book: BookSummary,
    pub rating: i32,
    pub review_snippet: Option<String>,
    pub rated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenreCount {
    pub genre: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthorCount {
    pub author: String,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyBookCount {
    /// 1..=12
    pub month: u32,
    pub count: i64,
}

/// Annual reading statistics, computed from ratings with `rating > 0`.
#[derive(Debug, Clone)]
pub struct UserYearStats {
    pub year: i32,
    pub books_read: i64,
    pub average_rating: f64,
    pub top_genres: Vec<GenreCount>,
    pub favorite_authors: Vec<AuthorCount>,
    /// Sparse: months without activity are absent.
    pub monthly: Vec<MonthlyBookCount>,
    pub longest_streak: u32,
}

impl UserYearStats {
    /// Twelve counts, January first, with empty months filled with zero.
    pub fn dense_monthly(&self) -> [i64; 12] {
        let mut slots = [0; 12];
        for m in &self.monthly {
            if (1..=12).contains(&m.month) {
                slots[(m.month - 1) as usize] = m.count;
            }
        }
        slots
    }
}

/// Base aggregate the stats store returns before the per-section queries.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct YearTotals {
    pub books_read: i64,
    pub average_rating: f64,
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub id: i32,
    pub user_id: i32,
    pub rating_id: i32,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CommentWithUser {
    pub comment: Comment,
    pub username: String,
}

pub const MAX_COMMENT_CHARS: usize = 2000;

#[derive(Debug, Clone, PartialEq)]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
    /// When the follow edge was created.
    pub followed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowStats {
    pub followers: i64,
    pub following: i64,
    pub is_following: bool,
}

/// Cut a review to [`REVIEW_SNIPPET_CHARS`] characters, appending `...` when cut.
pub fn review_snippet(review: &str) -> String {
    match review.char_indices().nth(REVIEW_SNIPPET_CHARS) {
        Some((idx, _)) => format!("{}...", &review[..idx]),
        None => review.to_owned(),
    }
}

/// Longest run of consecutive calendar days.
///
/// Gap-and-island: over the sorted distinct dates, `day_number - index` stays
/// constant within a run of consecutive days, so each distinct key is one island.
pub fn longest_streak(dates: &[NaiveDate]) -> u32 {
    let mut days: Vec<i64> = dates
        .iter()
        .map(|d| i64::from(d.num_days_from_ce()))
        .collect();
    days.sort_unstable();
    days.dedup();

    let mut best = 0u32;
    let mut current = 0u32;
    let mut island: Option<i64> = None;
    for (idx, day) in days.iter().enumerate() {
        let key = day - idx as i64;
        if island == Some(key) {
            current += 1;
        } else {
            island = Some(key);
            current = 1;
        }
        best = best.max(current);
    }
    best
}
