use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

// =============================================================================
// Knowledge base
// =============================================================================

/// A single counter-UAS product as described by the knowledge base document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrying_capacity: Option<String>,
    #[serde(default)]
    pub key_features: Vec<String>,
    #[serde(default)]
    pub use_cases: Vec<String>,
    #[serde(default)]
    pub operation_steps: Vec<String>,
}

/// Wire shape of the knowledge base document: `{ "products": { name: {...} } }`.
#[derive(Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    products: serde_json::Map<String, serde_json::Value>,
}

/// Ordered product catalog keyed by product name.
///
/// Iteration order is the order in which products appear in the source
/// document; lookups that return "the first match" rely on it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    products: Vec<(String, Product)>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a knowledge base document.
    pub fn from_json(content: &str) -> Result<Self> {
        let document: CatalogDocument = serde_json::from_str(content)?;
        let mut catalog = Catalog::new();
        for (name, value) in document.products {
            let product: Product = serde_json::from_value(value)?;
            catalog.insert(name, product);
        }
        Ok(catalog)
    }

    /// Serialize back into the document shape, preserving product order.
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut products = serde_json::Map::new();
        for (name, product) in &self.products {
            products.insert(name.clone(), serde_json::to_value(product)?);
        }
        let document = serde_json::json!({ "products": products });
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Insert a product, replacing any existing entry with the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, product: Product) {
        let name = name.into();
        match self.products.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = product,
            None => self.products.push((name, product)),
        }
    }

    /// Exact-name access.
    pub fn get(&self, name: &str) -> Option<&Product> {
        self.products
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p)
    }

    pub fn names(&self) -> Vec<String> {
        self.products.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Product)> {
        self.products.iter().map(|(n, p)| (n.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

// =============================================================================
// Chat
// =============================================================================

/// One entry in a conversation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub is_user: bool,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// A message typed by the user.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }

    /// A message produced by the assistant.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }

    fn new(text: impl Into<String>, is_user: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            is_user,
            timestamp: Utc::now(),
        }
    }

    /// Speaker label used when replaying the message into a prompt.
    pub fn speaker(&self) -> &'static str {
        if self.is_user {
            "User"
        } else {
            "Assistant"
        }
    }
}

// =============================================================================
// Reviews
// =============================================================================

/// Valid range of a single category score.
pub const RATING_SCALE: std::ops::RangeInclusive<u8> = 1..=5;

/// Per-category scores of a review, each on a 1-5 scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRatings {
    pub transportability: u8,
    pub ease_of_use: u8,
    pub interoperability: u8,
    pub detection: u8,
    pub reliability: u8,
}

impl CategoryRatings {
    /// Mean of the five category scores, rounded to one decimal.
    pub fn average(&self) -> f64 {
        let sum = u32::from(self.transportability)
            + u32::from(self.ease_of_use)
            + u32::from(self.interoperability)
            + u32::from(self.detection)
            + u32::from(self.reliability);
        (f64::from(sum) / 5.0 * 10.0).round() / 10.0
    }

    /// First category scored outside 1-5, as `(field, score)`.
    pub fn out_of_range(&self) -> Option<(&'static str, u8)> {
        [
            ("transportability", self.transportability),
            ("easeOfUse", self.ease_of_use),
            ("interoperability", self.interoperability),
            ("detection", self.detection),
            ("reliability", self.reliability),
        ]
        .into_iter()
        .find(|(_, score)| !RATING_SCALE.contains(score))
    }
}

/// A product review submitted by an operator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub author: String,
    #[serde(default)]
    pub mil_service: String,
    #[serde(default)]
    pub role: String,
    pub category_ratings: CategoryRatings,
    pub review_text: String,
}
