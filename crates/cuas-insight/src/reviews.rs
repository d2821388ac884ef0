//! Loading review records from disk.

use std::path::Path;

use cuas_core::Review;
use serde::Deserialize;
use tracing::debug;

use crate::error::InsightError;

/// Accepted review file layouts.
#[derive(Deserialize)]
#[serde(untagged)]
enum ReviewFile {
    List(Vec<Review>),
    Wrapped { reviews: Vec<Review> },
}

/// Read reviews from a JSON file, preserving file order.
///
/// The file holds either a bare array of reviews or `{ "reviews": [...] }`.
pub async fn load_reviews(path: &Path) -> Result<Vec<Review>, InsightError> {
    let content = tokio::fs::read_to_string(path).await?;
    let reviews = parse_reviews(&content)?;
    debug!(path = %path.display(), count = reviews.len(), "Loaded reviews");
    Ok(reviews)
}

fn parse_reviews(content: &str) -> Result<Vec<Review>, InsightError> {
    let reviews = match serde_json::from_str::<ReviewFile>(content) {
        Ok(ReviewFile::List(reviews)) | Ok(ReviewFile::Wrapped { reviews }) => reviews,
        Err(e) => return Err(InsightError::Parse(e.to_string())),
    };
    for (i, review) in reviews.iter().enumerate() {
        if let Some((field, score)) = review.category_ratings.out_of_range() {
            return Err(InsightError::Parse(format!(
                "review {} by {}: {} rating {} is outside 1-5",
                i, review.author, field, score
            )));
        }
    }
    Ok(reviews)
}
