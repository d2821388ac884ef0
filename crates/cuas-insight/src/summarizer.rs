//! Backend-generated summaries of operator reviews.

use std::sync::Arc;

use cuas_core::{CategoryRatings, Review};
use cuas_llm::TextGenerator;
use tracing::{error, info};

/// Returned for an empty review list. No backend call is made.
pub const NO_REVIEWS: &str = "No reviews available for this product yet.";

/// Returned when the backend fails while summarizing.
pub const SUMMARY_UNAVAILABLE: &str =
    "Unable to generate summary at this time. Please try again later.";

/// Returned when the backend fails while drafting a review.
pub const DRAFT_UNAVAILABLE: &str =
    "Unable to generate review content at this time. Please try again later.";

const REVIEW_SEPARATOR: &str = "\n\n---\n\n";

/// Mean of the five category scores, rounded to one decimal.
pub fn average_rating(ratings: &CategoryRatings) -> f64 {
    ratings.average()
}

/// Mean of the per-review averages, rounded to one decimal. `None` when empty.
pub fn product_average(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let total: f64 = reviews
        .iter()
        .map(|r| average_rating(&r.category_ratings))
        .sum();
    Some((total / reviews.len() as f64 * 10.0).round() / 10.0)
}

/// Summarizes reviews through a text-generation backend.
///
/// Never fails: backend errors resolve to [`SUMMARY_UNAVAILABLE`] or
/// [`DRAFT_UNAVAILABLE`].
pub struct ReviewSummarizer {
    generator: Arc<dyn TextGenerator>,
}

impl ReviewSummarizer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Long-form summary with five sections: sentiment and averages,
    /// strengths and weaknesses, themes, recommendations, suitability.
    pub async fn summarize(&self, product: &str, reviews: &[Review]) -> String {
        if reviews.is_empty() {
            return NO_REVIEWS.to_string();
        }
        let prompt = format!(
            "Please provide a comprehensive summary of all reviews for the \"{product}\" counter-UAS system. \
             Analyze the following reviews and provide:\n\
             \n\
             1. Overall sentiment and average ratings across all categories\n\
             2. Key strengths and weaknesses mentioned\n\
             3. Common themes and patterns in feedback\n\
             4. Recommendations or concerns from users\n\
             5. Summary of suitability for different military contexts\n\
             \n\
             Reviews:\n\
             {}\n\
             \n\
             Please keep the summary concise but informative, focusing on actionable insights for potential users.",
            render_reviews(reviews)
        );
        self.run(product, reviews.len(), &prompt, SUMMARY_UNAVAILABLE)
            .await
    }

    /// Two to three sentence summary.
    pub async fn summarize_brief(&self, product: &str, reviews: &[Review]) -> String {
        if reviews.is_empty() {
            return NO_REVIEWS.to_string();
        }
        let prompt = format!(
            "Summarize the following reviews of the \"{product}\" counter-UAS system in 2-3 sentences. \
             Cover the overall sentiment and the most frequently mentioned strength and concern.\n\
             \n\
             Reviews:\n\
             {}",
            render_reviews(reviews)
        );
        self.run(product, reviews.len(), &prompt, SUMMARY_UNAVAILABLE)
            .await
    }

    /// Free-form review content from a caller-written prompt.
    pub async fn draft_review(&self, prompt: &str) -> String {
        match self.generator.generate(prompt).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                error!(backend = self.generator.name(), "Empty review draft");
                DRAFT_UNAVAILABLE.to_string()
            }
            Err(e) => {
                error!(backend = self.generator.name(), error = %e, "Review draft failed");
                DRAFT_UNAVAILABLE.to_string()
            }
        }
    }

    async fn run(&self, product: &str, count: usize, prompt: &str, fallback: &str) -> String {
        match self.generator.generate(prompt).await {
            Ok(text) if !text.trim().is_empty() => {
                info!(product, reviews = count, "Generated review summary");
                text.trim().to_string()
            }
            Ok(_) => {
                error!(product, backend = self.generator.name(), "Empty review summary");
                fallback.to_string()
            }
            Err(e) => {
                error!(product, backend = self.generator.name(), error = %e, "Review summary failed");
                fallback.to_string()
            }
        }
    }
}

/// One block per review, separated by horizontal rules.
fn render_reviews(reviews: &[Review]) -> String {
    reviews
        .iter()
        .map(render_review)
        .collect::<Vec<_>>()
        .join(REVIEW_SEPARATOR)
}

fn render_review(review: &Review) -> String {
    let r = &review.category_ratings;
    format!(
        "Reviewer: {} ({} - {})\n\
         Rating: {:.1}/5\n\
         Transportability: {}/5\n\
         Ease of Use: {}/5\n\
         Interoperability: {}/5\n\
         Detection: {}/5\n\
         Reliability: {}/5\n\
         Review: {}",
        review.author,
        review.mil_service,
        review.role,
        average_rating(r),
        r.transportability,
        r.ease_of_use,
        r.interoperability,
        r.detection,
        r.reliability,
        review.review_text,
    )
}
