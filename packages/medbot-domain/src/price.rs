//! Price extraction from retrieved documents.
//!
//! Each document is handled by the first rule that yields a price, from most to least specific:
//!
//! 1. `has_price_info` metadata with `price_data`, merged as-is.
//! 2. `<treatment> cost|price ... <number>` pairs in the content.
//! 3. Lines mentioning `cost|price|charge` next to a number; the line's longer words become the
//!    treatment name.
//! 4. A single number anywhere after a cost or currency keyword, attributed to the first longer
//!    word of the document. Never overwrites an existing key.
//!
//! Rule 4 can attribute a price to an unrelated word when no treatment name is nearby. That is a
//! known best-effort limitation.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
	document::{PriceMap, RetrievedDocument},
	matcher::normalize_treatment_name,
};

const NAME_STOP_WORDS: &[&str] =
	&["price", "cost", "bdt", "taka", "charge", "treatment", "service", "procedure"];
const FILLER_WORDS: &[&str] = &["a", "an", "the", "of", "for", "and", "our", "your"];

static TREATMENT_PRICE: LazyLock<Regex> = LazyLock::new(|| {
	crate::compile(r"(?i)([a-z][a-z \t/-]*)\s*(?:cost|price)[^\d\n]*?(\d+(?:,\d{3})*(?:\.\d+)?)")
});
static LINE_PRICE: LazyLock<Regex> = LazyLock::new(|| {
	crate::compile(r"(?i)(?:cost|price|charge)[^\d\n]*?(\d+(?:,\d{3})*(?:\.\d+)?)")
});
static BARE_PRICE: LazyLock<Regex> = LazyLock::new(|| {
	crate::compile(r"(?i)\b(?:cost|price|charge|fee|bdt|taka|tk)\b\D*?(\d+(?:,\d{3})*(?:\.\d+)?)")
});

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rule {
	Metadata,
	TreatmentPrice,
	LineHeuristic,
	BarePrice,
}

/// Builds the price map for one batch of documents.
pub fn extract_prices<'a, I>(documents: I) -> PriceMap
where
	I: IntoIterator<Item = &'a RetrievedDocument>,
{
	let mut prices = PriceMap::new();

	for (idx, document) in documents.into_iter().enumerate() {
		let rule = extract_from_document(document, &mut prices);

		tracing::debug!(document = idx, rule = ?rule, "Price extraction finished for document.");
	}

	if prices.is_empty() {
		tracing::debug!("No price found in retrieved documents.");
	}

	prices
}

fn extract_from_document(document: &RetrievedDocument, prices: &mut PriceMap) -> Option<Rule> {
	if document.has_price_info()
		&& let Some(data) = document.price_data()
	{
		for (treatment, price) in data {
			prices.insert(treatment, price);
		}

		return Some(Rule::Metadata);
	}

	let content = document.content.as_str();

	if scan_treatment_prices(content, prices) > 0 {
		return Some(Rule::TreatmentPrice);
	}
	if scan_price_lines(content, prices) > 0 {
		return Some(Rule::LineHeuristic);
	}
	if scan_bare_price(content, prices) {
		return Some(Rule::BarePrice);
	}

	None
}

/// Records every `<treatment> cost|price ... <number>` pair. Later pairs overwrite earlier ones.
pub fn scan_treatment_prices(content: &str, prices: &mut PriceMap) -> usize {
	let mut recorded = 0;

	for captures in TREATMENT_PRICE.captures_iter(content) {
		let (Some(name), Some(price)) = (captures.get(1), captures.get(2)) else { continue };
		let name = strip_filler(&normalize_treatment_name(name.as_str()));

		if !is_plausible_name(&name) {
			continue;
		}
		if prices.insert(&name, clean_number(price.as_str())) {
			recorded += 1;
		}
	}

	recorded
}

/// For each line with a `cost|price|charge` number, joins the line's longer words into a name.
pub fn scan_price_lines(content: &str, prices: &mut PriceMap) -> usize {
	let mut recorded = 0;

	for line in content.lines() {
		let Some(price) = LINE_PRICE.captures(line).and_then(|captures| captures.get(1)) else {
			continue;
		};
		let words = candidate_words(line).collect::<Vec<_>>();

		if words.is_empty() {
			continue;
		}
		if prices.insert(&words.join(" "), clean_number(price.as_str())) {
			recorded += 1;
		}
	}

	recorded
}

/// Attributes the first keyword-adjacent number to the document's first longer word.
pub fn scan_bare_price(content: &str, prices: &mut PriceMap) -> bool {
	let Some(price) = BARE_PRICE.captures(content).and_then(|captures| captures.get(1)) else {
		return false;
	};
	let Some(name) = candidate_words(content).next() else { return false };

	if prices.contains(&name) {
		return false;
	}

	prices.insert(&name, clean_number(price.as_str()))
}

/// Renders a price in the canonical `<amount>.00 BDT` form.
///
/// Whole amounts gain `.00`, single-digit fractions are padded, longer fractions are kept.
pub fn format_price(price: &str) -> String {
	let amount = price.trim();

	match amount.split_once('.') {
		None => format!("{amount}.00 BDT"),
		Some((whole, "")) => format!("{whole}.00 BDT"),
		Some((whole, fraction)) if fraction.len() == 1 => format!("{whole}.{fraction}0 BDT"),
		Some(_) => format!("{amount} BDT"),
	}
}

fn candidate_words(text: &str) -> impl Iterator<Item = String> + '_ {
	text.split_whitespace()
		.map(|word| word.trim_matches(|ch: char| !ch.is_alphanumeric()).to_lowercase())
		.filter(|word| {
			word.chars().count() > 3
				&& !word.chars().all(|ch| ch.is_ascii_digit() || ch == ',' || ch == '.')
				&& !NAME_STOP_WORDS.contains(&word.as_str())
		})
}

fn strip_filler(name: &str) -> String {
	name.split(' ')
		.skip_while(|word| FILLER_WORDS.contains(word))
		.collect::<Vec<_>>()
		.join(" ")
}

fn is_plausible_name(name: &str) -> bool {
	name.chars().count() > 2 && !name.chars().all(|ch| ch.is_ascii_digit() || ch == ' ')
}

fn clean_number(raw: &str) -> String {
	raw.replace(',', "")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn treatment_price_pairs_tolerate_hyphenated_names() {
		let mut prices = PriceMap::new();

		assert_eq!(scan_treatment_prices("X-Ray price: 500 BDT", &mut prices), 1);
		assert_eq!(prices.get("xray"), Some("500"));
	}

	#[test]
	fn treatment_price_drops_leading_articles() {
		let mut prices = PriceMap::new();

		scan_treatment_prices("The root canal cost is 1,500 BDT.", &mut prices);

		assert_eq!(prices.iter().collect::<Vec<_>>(), vec![("root canal", "1500")]);
	}

	#[test]
	fn article_only_names_defer_to_the_line_rule() {
		let mut prices = PriceMap::new();

		assert_eq!(scan_treatment_prices("The price of root canal treatment is 5000", &mut prices), 0);
		assert_eq!(scan_price_lines("The price of root canal treatment is 5000", &mut prices), 1);
		assert_eq!(prices.get("root canal"), Some("5000"));
	}

	#[test]
	fn bare_price_keeps_existing_keys() {
		let mut prices = PriceMap::new();

		prices.insert("consultation", "300");

		assert!(!scan_bare_price("Consultation\nBDT 900", &mut prices));
		assert_eq!(prices.get("consultation"), Some("300"));
	}

	#[test]
	fn formats_prices_canonically() {
		assert_eq!(format_price("500"), "500.00 BDT");
		assert_eq!(format_price("500.00"), "500.00 BDT");
		assert_eq!(format_price("750.5"), "750.50 BDT");
		assert_eq!(format_price("1,200."), "1,200.00 BDT");
	}
}
