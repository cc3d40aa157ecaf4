use medbot_domain::VariationCategory;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Retrieval error: {message}")]
	Retrieval { message: String },
	#[error("Generation error: {message}")]
	Generation { message: String },
	#[error("Generation timed out after {timeout_ms} ms.")]
	Timeout { timeout_ms: u64 },
	#[error("Connection error: {message}")]
	Connection { message: String },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
}
impl Error {
	/// The phrasing family shown to the user when this failure ends a request.
	pub fn fallback_category(&self) -> VariationCategory {
		match self {
			Self::Retrieval { .. } => VariationCategory::SearchError,
			Self::Generation { .. } => VariationCategory::LlmError,
			Self::Timeout { .. } => VariationCategory::TimeoutError,
			Self::Connection { .. } => VariationCategory::ConnectionError,
			Self::InvalidRequest { .. } => VariationCategory::GeneralError,
		}
	}
}
