use medbot_domain::{
	PriceMap, QueryClassification, ScoredDocument, classify::extract_shorthand_subject,
	compose::title_case, format_price,
};

/// Rewrites the user query into the retrieval query.
///
/// `<name> BDT` shorthand becomes `<name> treatment procedure price cost`; other price queries
/// that name neither price nor cost gain ` price cost`.
pub fn enhance_query(query: &str, classification: &QueryClassification) -> String {
	let query = query.trim();

	if let Some(subject) = extract_shorthand_subject(query) {
		return format!("{subject} treatment procedure price cost");
	}

	let lowered = query.to_lowercase();

	if classification.is_price_query && !lowered.contains("price") && !lowered.contains("cost") {
		return format!("{query} price cost");
	}

	query.to_string()
}

/// Keeps hits scoring strictly below `threshold`. Lower scores are closer matches.
pub fn filter_by_score(hits: Vec<ScoredDocument>, threshold: f32) -> Vec<ScoredDocument> {
	let total = hits.len();
	let kept = hits.into_iter().filter(|hit| hit.score < threshold).collect::<Vec<_>>();

	tracing::debug!(total, kept = kept.len(), threshold, "Retrieval hits filtered by score.");

	kept
}

pub fn score_threshold(cfg: &medbot_config::Retrieval, is_price_query: bool) -> f32 {
	if is_price_query { cfg.price_score_threshold } else { cfg.score_threshold }
}

/// System prompt, known prices for price queries, then the question.
pub fn build_prompt(
	query: &str,
	classification: &QueryClassification,
	prices: &PriceMap,
	cfg: &medbot_config::Generation,
) -> String {
	let mut prompt = if classification.is_price_query {
		cfg.price_system_prompt.clone()
	} else {
		cfg.general_system_prompt.clone()
	};

	if classification.is_price_query && !prices.is_empty() {
		prompt.push_str("\n\nKnown prices:");

		for (treatment, price) in prices.iter() {
			prompt.push_str(&format!("\n- {}: {}", title_case(treatment), format_price(price)));
		}
	}

	prompt.push_str(&format!("\n\nQuestion: {}", query.trim()));

	prompt
}
