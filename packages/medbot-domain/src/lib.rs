pub mod classify;
pub mod compose;
pub mod context;
pub mod document;
pub mod matcher;
pub mod price;
pub mod text;
pub mod variation;

pub use classify::{QueryClassification, classify};
pub use compose::{ComposeInput, EMPTY_DRAFT_APOLOGY, ResponseComposer};
pub use context::ContextAssembler;
pub use document::{PriceMap, RetrievedDocument, ScoredDocument};
pub use matcher::{TreatmentMatcher, normalize_treatment_name, treatments_match};
pub use price::{extract_prices, format_price};
pub use text::{count_sentences, limit_sentences};
pub use variation::VariationCategory;

use regex::Regex;

/// Compiles one of this crate's pattern literals. Panics on an invalid literal.
pub(crate) fn compile(pattern: &str) -> Regex {
	Regex::new(pattern).unwrap_or_else(|err| panic!("Invalid built-in pattern {pattern:?}: {err}."))
}
