//! Final answer rendering.
//!
//! The pipeline is linear: direct-price template, price injection, price-token normalization,
//! sentence limiting, randomized phrasing, stock-phrase substitution. A direct price answer
//! returns right after the first step.

use std::sync::LazyLock;

use rand::{Rng, SeedableRng, rngs::StdRng};
use regex::{Captures, Regex};

use crate::{
	document::PriceMap,
	matcher::TreatmentMatcher,
	price::format_price,
	text::{ends_with_terminator, limit_sentences},
	variation::{self, PRICING_UNKNOWN_STOCK_PHRASE, UNCERTAINTY_STOCK_PHRASE, VariationCategory},
};

pub const EMPTY_DRAFT_APOLOGY: &str =
	"I apologize, but I couldn't find any relevant information for your query.";

const CLARIFICATION_OFFERS: &[&str] = &["let me know", "anything else", "clarification"];
const ACKNOWLEDGMENT_PROBABILITY: f64 = 0.5;

static ANY_PRICE_TOKEN: LazyLock<Regex> =
	LazyLock::new(|| crate::compile(r"(?i)\d+(?:,\d{3})*(?:\.\d+)?\s*(?:BDT|Taka|Tk)\b"));
static PRICE_TOKEN: LazyLock<Regex> =
	LazyLock::new(|| crate::compile(r"(?i)(\d+(?:,\d{3})*)(\.\d*)?\s*(?:BDT|Taka|Tk)\b"));
static GLUED_PRICE: LazyLock<Regex> =
	LazyLock::new(|| crate::compile(r"([^\s\d.,/(\[-])(\d+(?:,\d{3})*\.\d+ BDT)"));

/// Everything [`ResponseComposer::compose`] reads for one answer.
#[derive(Clone, Copy)]
pub struct ComposeInput<'a> {
	/// Generated text, or a stock phrase when retrieval found nothing.
	pub draft: &'a str,
	pub prices: &'a PriceMap,
	pub is_direct_price: bool,
	pub treatment: Option<&'a str>,
	pub max_sentences: usize,
	pub matcher: &'a TreatmentMatcher,
}

/// Renders answers with an injected random source.
///
/// Seed the generator (`response.seed` or [`ResponseComposer::seeded`]) to make template and
/// phrase selection reproducible.
pub struct ResponseComposer<R = StdRng> {
	rng: R,
	prepend_probability: f64,
	append_probability: f64,
}
impl ResponseComposer {
	pub fn new(cfg: &medbot_config::Response) -> Self {
		let rng = match cfg.seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_entropy(),
		};

		Self::with_rng(rng, cfg)
	}

	pub fn seeded(seed: u64) -> Self {
		Self::with_rng(StdRng::seed_from_u64(seed), &medbot_config::Response::default())
	}
}
impl<R> ResponseComposer<R>
where
	R: Rng,
{
	pub fn with_rng(rng: R, cfg: &medbot_config::Response) -> Self {
		Self {
			rng,
			prepend_probability: probability(cfg.prepend_probability),
			append_probability: probability(cfg.append_probability),
		}
	}

	pub fn compose(&mut self, input: &ComposeInput<'_>) -> String {
		if input.is_direct_price
			&& let Some(treatment) = input.treatment
			&& let Some((_, price)) = input.matcher.resolve(treatment, input.prices)
		{
			tracing::debug!(treatment, price, "Answering with the direct price template.");

			return self.direct_price_response(treatment, price);
		}
		if input.draft.trim().is_empty() {
			return EMPTY_DRAFT_APOLOGY.to_string();
		}

		let text = inject_price(input.draft.trim(), input);
		let text = normalize_price_tokens(&text);
		let text = limit_sentences(&text, input.max_sentences);
		let text = self.add_human_touch(text, input.treatment);

		self.substitute_stock_phrase(text)
	}

	/// `<template with treatment and price> <disclaimer>`.
	pub fn direct_price_response(&mut self, treatment: &str, price: &str) -> String {
		let template = VariationCategory::DirectPriceResponse.pick(&mut self.rng);
		let disclaimer = VariationCategory::PriceDisclaimer.pick(&mut self.rng);
		let body = template
			.replace("{treatment}", &title_case(treatment.trim()))
			.replace("{price}", &format_price(price));

		format!("{body} {disclaimer}")
	}

	pub fn error_response(&mut self, category: &str) -> &'static str {
		variation::error_response(category, &mut self.rng)
	}

	pub fn greeting(&mut self) -> &'static str {
		variation::greeting(&mut self.rng)
	}

	pub fn pick(&mut self, category: VariationCategory) -> &'static str {
		category.pick(&mut self.rng)
	}

	fn add_human_touch(&mut self, mut text: String, treatment: Option<&str>) -> String {
		if self.rng.gen_bool(self.prepend_probability) && accepts_prefix(&text) {
			let prefix = match treatment.map(str::trim).filter(|value| !value.is_empty()) {
				Some(treatment) if self.rng.gen_bool(ACKNOWLEDGMENT_PROBABILITY) => format!(
					"{}{treatment}, ",
					VariationCategory::Acknowledgment.pick(&mut self.rng)
				),
				_ => VariationCategory::Transition.pick(&mut self.rng).to_string(),
			};

			text = format!("{prefix}{}", lowercase_first(&text));
		}
		if self.rng.gen_bool(self.append_probability)
			&& !text.trim_end().ends_with('?')
			&& !offers_clarification(&text)
		{
			let closing = VariationCategory::Closing.pick(&mut self.rng);

			text = format!("{} {closing}", text.trim_end());
		}

		text
	}

	fn substitute_stock_phrase(&mut self, text: String) -> String {
		for (phrase, category) in [
			(PRICING_UNKNOWN_STOCK_PHRASE, VariationCategory::PricingUnknown),
			(UNCERTAINTY_STOCK_PHRASE, VariationCategory::Uncertainty),
		] {
			let Some(start) = text.find(phrase) else { continue };
			let mut end = start + phrase.len();

			if text[end..].starts_with('.') {
				end += 1;
			}

			let replacement = category.pick(&mut self.rng);

			return format!("{}{replacement}{}", &text[..start], &text[end..]);
		}

		text
	}
}

/// Adds the price to a draft that does not mention one yet.
///
/// The first price-map key found in the draft gets ` costs <price>` inserted after it. Otherwise
/// the query's treatment is resolved against the map and either annotated in place or stated in a
/// trailing sentence.
pub fn inject_price(draft: &str, input: &ComposeInput<'_>) -> String {
	if input.prices.is_empty() || ANY_PRICE_TOKEN.is_match(draft) {
		return draft.to_string();
	}

	for (key, price) in input.prices.iter() {
		if let Some(end) = find_case_insensitive(draft, key) {
			return insert_cost(draft, end, price);
		}
	}

	let Some(treatment) = input.treatment.map(str::trim).filter(|value| !value.is_empty()) else {
		return draft.to_string();
	};
	let Some((_, price)) = input.matcher.resolve(treatment, input.prices) else {
		return draft.to_string();
	};

	if let Some(end) = find_case_insensitive(draft, treatment) {
		return insert_cost(draft, end, price);
	}

	let sentence = format!("The cost for {treatment} is {}.", format_price(price));

	if ends_with_terminator(draft) {
		format!("{draft} {sentence}")
	} else {
		format!("{draft}. {sentence}")
	}
}

/// Rewrites every `<number> BDT|Taka|Tk` token into the canonical `<number>.00 BDT` form and
/// separates price tokens glued to the preceding word.
pub fn normalize_price_tokens(text: &str) -> String {
	let canonical = PRICE_TOKEN.replace_all(text, |captures: &Captures<'_>| {
		let whole = captures.get(1).map_or("", |m| m.as_str());
		let fraction = captures.get(2).map_or("", |m| m.as_str());

		format_price(&format!("{whole}{fraction}"))
	});

	GLUED_PRICE.replace_all(&canonical, "${1} ${2}").into_owned()
}

/// Title-cases like a display name: the first letter of every alphabetic run is uppercased.
pub fn title_case(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	let mut in_word = false;

	for ch in text.chars() {
		if ch.is_alphabetic() {
			if in_word {
				out.extend(ch.to_lowercase());
			} else {
				out.extend(ch.to_uppercase());
			}

			in_word = true;
		} else {
			out.push(ch);

			in_word = false;
		}
	}

	out
}

fn insert_cost(draft: &str, end: usize, price: &str) -> String {
	format!("{} costs {}{}", &draft[..end], format_price(price), &draft[end..])
}

fn find_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
	if needle.is_empty() {
		return None;
	}

	let pattern = Regex::new(&format!("(?i){}", regex::escape(needle))).ok()?;

	pattern.find(haystack).map(|found| found.end())
}

fn accepts_prefix(text: &str) -> bool {
	let lowered = text.to_lowercase();
	let starts_with_phrase = VariationCategory::Transition
		.phrases()
		.iter()
		.chain(VariationCategory::Acknowledgment.phrases())
		.any(|phrase| lowered.starts_with(&phrase.trim_end().to_lowercase()));

	!starts_with_phrase
		&& !text.contains(UNCERTAINTY_STOCK_PHRASE)
		&& !text.contains(PRICING_UNKNOWN_STOCK_PHRASE)
}

fn offers_clarification(text: &str) -> bool {
	let lowered = text.to_lowercase();

	CLARIFICATION_OFFERS.iter().any(|offer| lowered.contains(offer))
}

/// Lowercases the first letter so the text can follow a prefix, keeping `I` and acronyms.
fn lowercase_first(text: &str) -> String {
	let first_word = text.split_whitespace().next().unwrap_or_default();
	let word = first_word.trim_end_matches(|ch: char| !ch.is_alphanumeric());
	let is_pronoun = word == "I" || word.starts_with("I'");
	let is_acronym =
		word.chars().filter(|ch| ch.is_alphabetic()).count() > 1 && !word.chars().any(char::is_lowercase);

	if is_pronoun || is_acronym {
		return text.to_string();
	}

	let mut chars = text.chars();

	match chars.next() {
		Some(first) => first.to_lowercase().chain(chars).collect(),
		None => String::new(),
	}
}

fn probability(value: f64) -> f64 {
	if value.is_finite() { value.clamp(0.0, 1.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
	use super::*;

	fn input<'a>(
		draft: &'a str,
		prices: &'a PriceMap,
		treatment: Option<&'a str>,
		matcher: &'a TreatmentMatcher,
	) -> ComposeInput<'a> {
		ComposeInput { draft, prices, is_direct_price: false, treatment, max_sentences: 5, matcher }
	}

	#[test]
	fn title_case_capitalizes_each_alphabetic_run() {
		assert_eq!(title_case("x-ray"), "X-Ray");
		assert_eq!(title_case("ROOT canal"), "Root Canal");
	}

	#[test]
	fn lowercase_first_keeps_pronoun_and_acronyms() {
		assert_eq!(lowercase_first("The MRI is safe."), "the MRI is safe.");
		assert_eq!(lowercase_first("I can help."), "I can help.");
		assert_eq!(lowercase_first("MRI scans are safe."), "MRI scans are safe.");
	}

	#[test]
	fn injects_after_first_key_in_draft() {
		let matcher = TreatmentMatcher::default();
		let prices: PriceMap = [("root canal", "5000")].into_iter().collect();
		let out = inject_price("A Root Canal removes infected pulp.", &input(
			"",
			&prices,
			None,
			&matcher,
		));

		assert_eq!(out, "A Root Canal costs 5000.00 BDT removes infected pulp.");
	}

	#[test]
	fn appends_sentence_for_unmentioned_treatment() {
		let matcher = TreatmentMatcher::default();
		let prices: PriceMap = [("xray", "500")].into_iter().collect();
		let out = inject_price("Imaging is available on weekdays", &input(
			"",
			&prices,
			Some("X-Ray"),
			&matcher,
		));

		assert_eq!(out, "Imaging is available on weekdays. The cost for X-Ray is 500.00 BDT.");
	}

	#[test]
	fn drafts_with_prices_are_left_alone() {
		let matcher = TreatmentMatcher::default();
		let prices: PriceMap = [("filling", "800")].into_iter().collect();
		let draft = "A filling is 900 Tk at most clinics.";

		assert_eq!(inject_price(draft, &input("", &prices, None, &matcher)), draft);
	}

	#[test]
	fn normalizes_currency_variants() {
		assert_eq!(normalize_price_tokens("It is 500 Tk."), "It is 500.00 BDT.");
		assert_eq!(normalize_price_tokens("Costs 1,200 taka"), "Costs 1,200.00 BDT");
		assert_eq!(normalize_price_tokens("Fee:750.5 BDT"), "Fee: 750.50 BDT");
	}

	#[test]
	fn stock_phrase_is_replaced_with_pricing_variant() {
		let mut composer = ResponseComposer::seeded(3);
		let out = composer.substitute_stock_phrase(format!("{PRICING_UNKNOWN_STOCK_PHRASE}."));

		assert!(VariationCategory::PricingUnknown.phrases().contains(&out.as_str()));
	}
}
