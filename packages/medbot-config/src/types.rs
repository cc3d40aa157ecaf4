use serde::Deserialize;

pub const DEFAULT_GENERAL_SYSTEM_PROMPT: &str = "You are a helpful healthcare assistant. Please provide accurate and helpful information based on the context provided. If you cannot find the answer in the context, say so. Keep your responses concise and focused on the user's question.";
pub const DEFAULT_PRICE_SYSTEM_PROMPT: &str = "You are a healthcare pricing assistant. Please provide accurate pricing information based on the context provided. If you cannot find the price in the context, say so. Always include the currency (BDT) and note that prices may vary by facility.";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
	pub service: Service,
	pub retrieval: Retrieval,
	pub context: Context,
	pub matching: Matching,
	pub response: Response,
	pub cache: Cache,
	pub generation: Generation,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Service {
	pub log_level: String,
}
impl Default for Service {
	fn default() -> Self {
		Self { log_level: "info".to_string() }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Retrieval {
	/// Number of documents requested from the retrieval collaborator.
	pub search_k: u32,
	/// Distance cutoff for general queries. Lower scores are closer matches.
	pub score_threshold: f32,
	/// Distance cutoff for price queries. Looser than `score_threshold`.
	pub price_score_threshold: f32,
}
impl Default for Retrieval {
	fn default() -> Self {
		Self { search_k: 20, score_threshold: 0.55, price_score_threshold: 0.65 }
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Context {
	pub max_chars: usize,
	pub max_document_chars: usize,
	pub max_price_documents: usize,
	pub max_other_documents: usize,
}
impl Default for Context {
	fn default() -> Self {
		Self {
			max_chars: 4_000,
			max_document_chars: 500,
			max_price_documents: 3,
			max_other_documents: 2,
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Matching {
	pub overlap_threshold: f32,
	pub normalize_cache_size: usize,
	pub match_cache_size: usize,
}
impl Default for Matching {
	fn default() -> Self {
		Self { overlap_threshold: 0.7, normalize_cache_size: 256, match_cache_size: 512 }
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Response {
	pub max_sentences: usize,
	pub prepend_probability: f64,
	pub append_probability: f64,
	/// Fixes phrase selection when set. Leave unset in production.
	pub seed: Option<u64>,
}
impl Default for Response {
	fn default() -> Self {
		Self { max_sentences: 5, prepend_probability: 0.3, append_probability: 0.2, seed: None }
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Cache {
	pub response_capacity: usize,
	pub response_ttl_secs: u64,
	pub search_capacity: usize,
	pub search_ttl_secs: u64,
	pub treatment_capacity: usize,
	pub treatment_ttl_secs: u64,
}
impl Default for Cache {
	fn default() -> Self {
		Self {
			response_capacity: 1_000,
			response_ttl_secs: 300,
			search_capacity: 500,
			search_ttl_secs: 600,
			treatment_capacity: 200,
			treatment_ttl_secs: 172_800,
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Generation {
	pub timeout_ms: u64,
	pub general_system_prompt: String,
	pub price_system_prompt: String,
}
impl Default for Generation {
	fn default() -> Self {
		Self {
			timeout_ms: 30_000,
			general_system_prompt: DEFAULT_GENERAL_SYSTEM_PROMPT.to_string(),
			price_system_prompt: DEFAULT_PRICE_SYSTEM_PROMPT.to_string(),
		}
	}
}
