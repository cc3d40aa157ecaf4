//! Read-only phrase tables used to vary answer wording between calls.

use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

/// Canonical fallback wording that gets swapped for an `Uncertainty` variant.
pub const UNCERTAINTY_STOCK_PHRASE: &str = "I don't have information about that in my database";
/// Canonical fallback wording that gets swapped for a `PricingUnknown` variant.
pub const PRICING_UNKNOWN_STOCK_PHRASE: &str =
	"I don't have pricing information about that in my database";

const UNCERTAINTY: &[&str] = &[
	"I don't have enough information to answer that question accurately. Could you try asking something else?",
	"I'm unable to find information about that in my knowledge base. Could you try rephrasing your question?",
	"That's beyond the scope of my current knowledge. Please consult with a qualified healthcare provider for specific guidance.",
	"I don't have details on that in my records. It would be best to speak with a healthcare professional for accurate information.",
	"I'm not able to provide information on that topic. I'd suggest reaching out to a medical professional for assistance.",
];
const PRICING_UNKNOWN: &[&str] = &[
	"I couldn't find the cost information for that specific service. Prices can vary by healthcare provider, so it might be best to contact them directly.",
	"I don't have that pricing data in my records. For accurate pricing, I recommend contacting your healthcare provider directly.",
	"That pricing information isn't in my database. You'll need to check with the healthcare facility for their current rates.",
	"I don't have the specific cost information for that in my database. Healthcare pricing can vary based on many factors.",
];
// `{treatment}` is title-cased by the caller; `{price}` is the full canonical price, e.g. `500.00 BDT`.
const DIRECT_PRICE_RESPONSE: &[&str] = &[
	"The cost for {treatment} is {price} based on our healthcare provider database.",
	"{treatment} costs {price} according to our current pricing information.",
	"The price for {treatment} is {price} as per our healthcare records.",
	"Based on our data, {treatment} costs {price}.",
];
const PRICE_DISCLAIMER: &[&str] = &[
	"Actual prices may vary depending on the healthcare facility and specific circumstances.",
	"Please note that this is an approximate cost and may vary between providers.",
	"Keep in mind that final costs may differ based on your specific situation and the healthcare provider.",
	"This is an estimated cost and actual prices might vary by facility.",
];
const GREETING: &[&str] = &[
	"Hello! I'm your healthcare assistant. How can I help you today?",
	"Hi there! I'm ready to assist with your healthcare questions. What can I help you with?",
	"Welcome! I'm your medical information assistant. How may I assist you today?",
	"Greetings! I'm here to help with your healthcare inquiries. What would you like to know?",
];
const LLM_ERROR: &[&str] = &[
	"I'm having trouble processing your question at the moment. Our systems might be experiencing high demand. Could you try again in a moment?",
	"I apologize, but I'm having difficulty generating a response. Could you try simplifying your question?",
	"I'm experiencing some technical difficulties with generating a response. Would you mind rephrasing your question?",
	"It seems I'm having trouble formulating a proper response to your query. Can you try asking in a different way?",
];
const SEARCH_ERROR: &[&str] = &[
	"I'm having difficulty searching my knowledge base right now. This could be a temporary issue. Could you try again shortly?",
	"I can't seem to retrieve the information you're looking for at the moment. Would you mind trying again?",
	"I'm experiencing issues accessing my medical database. Please try your question again in a moment.",
	"Something went wrong when searching for information. This is likely a temporary issue. Could you try once more?",
];
const CONNECTION_ERROR: &[&str] = &[
	"I'm having trouble connecting to my knowledge sources at the moment. This might be a temporary network issue.",
	"There seems to be a connection problem with my databases. Please try your question again in a moment.",
	"I can't reach some of my information sources right now. This is likely a temporary issue that will resolve shortly.",
	"I'm experiencing some connectivity issues. Could you try your question again? If the problem persists, it might be resolved soon.",
];
const TIMEOUT_ERROR: &[&str] = &[
	"Your request is taking longer than expected to process. This might be due to high demand or the complexity of your question.",
	"I'm having trouble responding in a timely manner. Could you try a simpler question or try again later?",
	"It's taking me longer than usual to find an answer. This could be due to system load. Please try again shortly.",
	"I wasn't able to complete your request in time. Our systems might be busy at the moment. Please try again.",
];
const GENERAL_ERROR: &[&str] = &[
	"I encountered an unexpected issue while processing your request. Could you try asking in a different way?",
	"Something went wrong on my end. This is likely a temporary issue. Could you try your question again?",
	"I apologize, but I ran into a problem while handling your question. Would you mind rephrasing it?",
	"I hit a snag while working on your request. This is probably temporary. Could you try again?",
];
const TRANSITION: &[&str] = &[
	"Based on the information I have, ",
	"According to my database, ",
	"From what I understand, ",
	"From what I can tell, ",
	"My records show that ",
];
// Followed by the treatment name and a comma.
const ACKNOWLEDGMENT: &[&str] = &[
	"I see you're asking about ",
	"You're interested in ",
	"Regarding your question about ",
	"Concerning ",
	"About your inquiry on ",
];
const CLOSING: &[&str] = &[
	"Hope that helps!",
	"Does that answer your question?",
	"Is there anything else you'd like to know?",
	"Let me know if you need any clarification.",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariationCategory {
	Uncertainty,
	PricingUnknown,
	DirectPriceResponse,
	PriceDisclaimer,
	Greeting,
	LlmError,
	SearchError,
	ConnectionError,
	TimeoutError,
	GeneralError,
	Transition,
	Acknowledgment,
	Closing,
}
impl VariationCategory {
	pub const ALL: [Self; 13] = [
		Self::Uncertainty,
		Self::PricingUnknown,
		Self::DirectPriceResponse,
		Self::PriceDisclaimer,
		Self::Greeting,
		Self::LlmError,
		Self::SearchError,
		Self::ConnectionError,
		Self::TimeoutError,
		Self::GeneralError,
		Self::Transition,
		Self::Acknowledgment,
		Self::Closing,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Uncertainty => "uncertainty",
			Self::PricingUnknown => "pricing_unknown",
			Self::DirectPriceResponse => "direct_price_response",
			Self::PriceDisclaimer => "price_disclaimer",
			Self::Greeting => "greeting",
			Self::LlmError => "llm_error",
			Self::SearchError => "search_error",
			Self::ConnectionError => "connection_error",
			Self::TimeoutError => "timeout_error",
			Self::GeneralError => "general_error",
			Self::Transition => "transition",
			Self::Acknowledgment => "acknowledgment",
			Self::Closing => "closing",
		}
	}

	pub fn parse(name: &str) -> Option<Self> {
		let name = name.trim();

		Self::ALL.into_iter().find(|category| category.as_str().eq_ignore_ascii_case(name))
	}

	pub fn phrases(self) -> &'static [&'static str] {
		match self {
			Self::Uncertainty => UNCERTAINTY,
			Self::PricingUnknown => PRICING_UNKNOWN,
			Self::DirectPriceResponse => DIRECT_PRICE_RESPONSE,
			Self::PriceDisclaimer => PRICE_DISCLAIMER,
			Self::Greeting => GREETING,
			Self::LlmError => LLM_ERROR,
			Self::SearchError => SEARCH_ERROR,
			Self::ConnectionError => CONNECTION_ERROR,
			Self::TimeoutError => TIMEOUT_ERROR,
			Self::GeneralError => GENERAL_ERROR,
			Self::Transition => TRANSITION,
			Self::Acknowledgment => ACKNOWLEDGMENT,
			Self::Closing => CLOSING,
		}
	}

	pub fn is_error(self) -> bool {
		matches!(
			self,
			Self::LlmError
				| Self::SearchError
				| Self::ConnectionError
				| Self::TimeoutError
				| Self::GeneralError
		)
	}

	pub fn pick<R>(self, rng: &mut R) -> &'static str
	where
		R: Rng + ?Sized,
	{
		self.phrases().choose(rng).copied().unwrap_or_default()
	}
}

/// Picks an error phrasing by category name. Unknown or non-error names use `general_error`.
pub fn error_response<R>(name: &str, rng: &mut R) -> &'static str
where
	R: Rng + ?Sized,
{
	let category = VariationCategory::parse(name)
		.filter(|category| category.is_error())
		.unwrap_or(VariationCategory::GeneralError);

	category.pick(rng)
}

/// Picks an informational fallback by category name. Unknown names use `uncertainty`.
pub fn fallback_response<R>(name: &str, rng: &mut R) -> &'static str
where
	R: Rng + ?Sized,
{
	VariationCategory::parse(name).unwrap_or(VariationCategory::Uncertainty).pick(rng)
}

pub fn greeting<R>(rng: &mut R) -> &'static str
where
	R: Rng + ?Sized,
{
	VariationCategory::Greeting.pick(rng)
}

#[cfg(test)]
mod tests {
	use rand::{SeedableRng, rngs::StdRng};

	use super::*;

	#[test]
	fn every_category_has_phrases() {
		for category in VariationCategory::ALL {
			assert!(!category.phrases().is_empty(), "{} is empty", category.as_str());
		}
	}

	#[test]
	fn names_round_trip_through_parse() {
		for category in VariationCategory::ALL {
			assert_eq!(VariationCategory::parse(category.as_str()), Some(category));
		}

		assert_eq!(VariationCategory::parse("TIMEOUT_ERROR"), Some(VariationCategory::TimeoutError));
		assert_eq!(VariationCategory::parse("nope"), None);
	}

	#[test]
	fn unknown_error_names_fall_back_to_general_error() {
		let mut rng = StdRng::seed_from_u64(1);

		assert!(GENERAL_ERROR.contains(&error_response("disk_full", &mut rng)));
		assert!(GENERAL_ERROR.contains(&error_response("greeting", &mut rng)));
		assert!(TIMEOUT_ERROR.contains(&error_response("timeout_error", &mut rng)));
	}

	#[test]
	fn direct_templates_carry_both_placeholders() {
		for template in DIRECT_PRICE_RESPONSE {
			assert!(template.contains("{treatment}") && template.contains("{price}"));
		}
	}
}
