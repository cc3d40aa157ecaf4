//! Price-query detection and treatment-name extraction.
//!
//! Two shapes count as direct price lookups: the `<name> BDT` shorthand (also `Tk`, `Tk.`,
//! `Taka`) and interrogatives such as "how much does a root canal cost?". Direct lookups are
//! answered from the price map alone; every other price query still goes through generation.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

pub const PRICE_KEYWORDS: &[&str] = &[
	"price",
	"pricing",
	"cost",
	"fee",
	"charge",
	"payment",
	"pay",
	"expense",
	"expensive",
	"cheap",
	"affordable",
	"bill",
	"how much",
	"rate",
	"bdt",
	"taka",
	"tk",
];

const LEADING_STOP_WORDS: &[&str] = &["a", "an", "the"];
const PRONOUNS: &[&str] = &["it", "this", "that", "these", "those", "they", "them"];

static SHORTHAND_QUERY: LazyLock<Regex> =
	LazyLock::new(|| crate::compile(r"(?i)^\s*(.+?)\s*(?:BDT|Tk\.?|Taka)\s*$"));
static INTERROGATIVE_MARKERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
	[
		r"(?i)\bhow\s+much\b",
		r"(?i)\bwhat\s+(?:is|are)\s+the\s+(?:price|cost|fee|charge)",
		r"(?i)\b(?:price|cost|fee|charge)s?\s+(?:of|for)\b",
		r"(?i)\bhow\s+(?:expensive|costly)\b",
	]
	.into_iter()
	.map(crate::compile)
	.collect()
});
// Priority order: "how much does X cost" -> "what is the price of X" -> "price/cost of X".
static INTERROGATIVE_SUBJECTS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
	[
		r"(?i)\bhow\s+much\s+(?:(?:does|do|is|are|for|will|would|should)\s+)?(?:(?:a|an|the)\s+)?(.+?)(?:\s+(?:cost|price|charge|fee)s?)?(?:\s*\?|\s*$|\s+in\s+(?:bdt|taka|tk)\b)",
		r"(?i)\bwhat\s+(?:is|are)\s+the\s+(?:price|cost|fee|charge)s?(?:\s+(?:of|for))?\s+(?:(?:a|an|the)\s+)?(.+?)(?:\s*\?|\s*$|\s+in\s+(?:bdt|taka|tk)\b)",
		r"(?i)\b(?:price|cost|fee|charge)s?\s+(?:of|for)\s+(?:(?:a|an|the)\s+)?(.+?)(?:\s*\?|\s*$|\s+in\s+(?:bdt|taka|tk)\b)",
	]
	.into_iter()
	.map(crate::compile)
	.collect()
});

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct QueryClassification {
	pub is_price_query: bool,
	/// Always paired with a `treatment_name`.
	pub is_direct_price_query: bool,
	pub treatment_name: Option<String>,
}

pub fn classify(query: &str) -> QueryClassification {
	let interrogative = extract_interrogative_subject(query);
	let shorthand = extract_shorthand_subject(query);
	let is_direct_price_query = shorthand.is_some() || interrogative.is_some();
	// A shorthand match on "how much is an x-ray in BDT" would capture the whole question, so the
	// interrogative subject wins when both apply.
	let treatment_name = interrogative.or(shorthand);
	let classification = QueryClassification {
		is_price_query: is_price_query(query) || is_direct_price_query,
		is_direct_price_query,
		treatment_name,
	};

	tracing::debug!(
		is_price_query = classification.is_price_query,
		is_direct_price_query = classification.is_direct_price_query,
		treatment = classification.treatment_name.as_deref().unwrap_or(""),
		"Query classified."
	);

	classification
}

pub fn is_price_query(query: &str) -> bool {
	let lowered = query.to_lowercase();

	PRICE_KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
}

/// `<name> BDT`, `<name> Tk`, `<name> Tk.`, or `<name> Taka`, anchored at both ends.
pub fn is_shorthand_price_query(query: &str) -> bool {
	extract_shorthand_subject(query).is_some()
}

pub fn is_interrogative_price_query(query: &str) -> bool {
	INTERROGATIVE_MARKERS.iter().any(|pattern| pattern.is_match(query))
}

pub fn extract_shorthand_subject(query: &str) -> Option<String> {
	let captures = SHORTHAND_QUERY.captures(query.trim())?;
	let subject = captures.get(1)?.as_str().trim();

	(!subject.is_empty()).then(|| subject.to_string())
}

/// Returns the subject of the first interrogative pattern that matches, in priority order.
pub fn extract_interrogative_subject(query: &str) -> Option<String> {
	if !is_interrogative_price_query(query) {
		return None;
	}

	INTERROGATIVE_SUBJECTS.iter().find_map(|pattern| {
		let captured = pattern.captures(query)?.get(1)?.as_str();

		clean_subject(captured)
	})
}

fn clean_subject(raw: &str) -> Option<String> {
	let mut subject = raw.trim().trim_end_matches(['?', '.', '!']).trim_end();

	loop {
		let Some((first, rest)) = subject.split_once(char::is_whitespace) else { break };

		if !LEADING_STOP_WORDS.iter().any(|stop| first.eq_ignore_ascii_case(stop)) {
			break;
		}

		subject = rest.trim_start();
	}

	if subject.is_empty() || PRONOUNS.iter().any(|pronoun| subject.eq_ignore_ascii_case(pronoun)) {
		return None;
	}

	Some(subject.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn strips_stacked_articles() {
		assert_eq!(clean_subject("the a root canal?"), Some("root canal".to_string()));
	}

	#[test]
	fn pronoun_subjects_are_not_treatments() {
		assert_eq!(extract_interrogative_subject("how much does it cost?"), None);
	}

	#[test]
	fn article_prefix_inside_a_word_is_kept() {
		assert_eq!(
			extract_interrogative_subject("How much is anesthesia?"),
			Some("anesthesia".to_string())
		);
	}

	#[test]
	fn trailing_currency_clause_is_dropped() {
		assert_eq!(
			extract_interrogative_subject("what is the price of an MRI in BDT?"),
			Some("MRI".to_string())
		);
	}
}
