//! Grounding context for prompts.
//!
//! Turns the knowledge base and an optional focus product into the
//! instruction-and-data block that precedes every question.

use cuas_core::Product;
use cuas_knowledge::{KnowledgeStore, LoadState};

/// Returned instead of a context block while the knowledge base is still loading.
pub const NOT_READY_CONTEXT: &str = "Knowledge base is not loaded yet.";

/// Rendered for any field the knowledge base leaves empty.
pub const NOT_AVAILABLE: &str = "N/A";

const PREAMBLE: &str = "You are a C-UAS (counter-unmanned aircraft systems) expert assistant. \
Answer using only the product data supplied below. \
Be specific and quote exact figures (weights, ranges, capacities, times) whenever the data provides them. \
If the data does not contain the answer, say \"I don't have that information\" instead of guessing.";

// =============================================================================
// ContextBuilder
// =============================================================================

/// Builds the context block for a question.
///
/// Output depends only on the store contents and the focus name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextBuilder;

impl ContextBuilder {
    /// Build the context block.
    ///
    /// - Unloaded store: [`NOT_READY_CONTEXT`].
    /// - Otherwise: preamble and product list, plus a detailed section when
    ///   `focus` resolves to a product. An unresolved focus is ignored.
    pub fn build(&self, store: &KnowledgeStore, focus: Option<&str>) -> String {
        if store.state() == LoadState::Unloaded {
            return NOT_READY_CONTEXT.to_string();
        }

        let names = store.product_names();
        let product_list = if names.is_empty() {
            "Not available".to_string()
        } else {
            names.join(", ")
        };

        let mut context = format!("{}\n\nAvailable products: {}\n", PREAMBLE, product_list);

        if let Some((name, product)) = focus.and_then(|f| store.lookup(f)) {
            context.push('\n');
            context.push_str(&product_section(&name, &product));
        }

        context
    }
}

/// Detailed single-product section.
fn product_section(name: &str, product: &Product) -> String {
    format!(
        "Focused product: {name}\n\
         Manufacturer: {}\n\
         Category: {}\n\
         Description: {}\n\
         Weight: {}\n\
         Carrying Capacity: {}\n\
         Key Features: {}\n\
         Use Cases: {}\n\
         Operation Steps:{}\n",
        or_na(&product.manufacturer),
        or_na(&product.category),
        or_na(&product.description),
        or_na(product.weight.as_deref().unwrap_or_default()),
        or_na(product.carrying_capacity.as_deref().unwrap_or_default()),
        join_or_na(&product.key_features),
        join_or_na(&product.use_cases),
        numbered_steps(&product.operation_steps),
    )
}

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_AVAILABLE
    } else {
        value
    }
}

fn join_or_na(items: &[String]) -> String {
    if items.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        items.join(", ")
    }
}

/// Steps as a 1-based numbered list on their own lines, or ` N/A` inline.
fn numbered_steps(steps: &[String]) -> String {
    if steps.is_empty() {
        return format!(" {}", NOT_AVAILABLE);
    }
    steps
        .iter()
        .enumerate()
        .map(|(i, step)| format!("\n{}. {}", i + 1, step))
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
