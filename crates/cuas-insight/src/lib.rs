//! Review insight for C-UAS products.
//!
//! Provides:
//! - Backend-generated summaries of operator reviews (long and brief form)
//! - Free-form review drafting
//! - Rating averages and review file loading

pub mod error;
pub mod reviews;
pub mod summarizer;

pub use error::InsightError;
pub use reviews::load_reviews;
pub use summarizer::{
    average_rating, product_average, ReviewSummarizer, DRAFT_UNAVAILABLE, NO_REVIEWS,
    SUMMARY_UNAVAILABLE,
};
