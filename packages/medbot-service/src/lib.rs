pub mod cache;
pub mod query;

mod error;

pub use cache::{QueryCaches, TtlCache};
pub use error::{Error, Result};
pub use query::{build_prompt, enhance_query, filter_by_score, score_threshold};

use std::{
	future::Future,
	pin::Pin,
	sync::{Arc, Mutex, MutexGuard},
	time::Duration,
};

use serde::Serialize;

use medbot_config::Config;
use medbot_domain::{
	ComposeInput, ContextAssembler, EMPTY_DRAFT_APOLOGY, PriceMap, QueryClassification,
	ResponseComposer, RetrievedDocument, ScoredDocument, TreatmentMatcher, classify,
	extract_prices,
	variation::{PRICING_UNKNOWN_STOCK_PHRASE, UNCERTAINTY_STOCK_PHRASE},
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Vector search over the indexed healthcare documents.
pub trait Retriever
where
	Self: Send + Sync,
{
	fn search<'a>(&'a self, query: &'a str, k: u32) -> BoxFuture<'a, Result<Vec<ScoredDocument>>>;
}

/// Opaque text generation from a prompt and a retrieval context.
pub trait TextGenerator
where
	Self: Send + Sync,
{
	fn generate<'a>(&'a self, prompt: &'a str, context: &'a str) -> BoxFuture<'a, Result<String>>;
}

#[derive(Clone)]
pub struct Collaborators {
	pub retriever: Arc<dyn Retriever>,
	pub generator: Arc<dyn TextGenerator>,
}
impl Collaborators {
	pub fn new(retriever: Arc<dyn Retriever>, generator: Arc<dyn TextGenerator>) -> Self {
		Self { retriever, generator }
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Answer {
	pub response: String,
	pub is_price_query: bool,
	pub is_direct_price_query: bool,
	pub treatment: Option<String>,
	/// Raw price resolved for `treatment`, if any.
	pub price: Option<String>,
	pub from_cache: bool,
}
impl Answer {
	fn for_query(classification: &QueryClassification) -> Self {
		Self {
			is_price_query: classification.is_price_query,
			is_direct_price_query: classification.is_direct_price_query,
			treatment: classification.treatment_name.clone(),
			..Default::default()
		}
	}
}

pub struct ChatService {
	pub cfg: Config,
	collaborators: Collaborators,
	caches: Arc<QueryCaches>,
	matcher: TreatmentMatcher,
	assembler: ContextAssembler,
	composer: Mutex<ResponseComposer>,
}
impl ChatService {
	pub fn new(cfg: Config, collaborators: Collaborators) -> Self {
		let caches = Arc::new(QueryCaches::new(&cfg.cache));

		Self::with_caches(cfg, collaborators, caches)
	}

	pub fn with_caches(cfg: Config, collaborators: Collaborators, caches: Arc<QueryCaches>) -> Self {
		let matcher = TreatmentMatcher::new(&cfg.matching);
		let assembler = ContextAssembler::new(&cfg.context);
		let composer = Mutex::new(ResponseComposer::new(&cfg.response));

		Self { cfg, collaborators, caches, matcher, assembler, composer }
	}

	pub fn caches(&self) -> &Arc<QueryCaches> {
		&self.caches
	}

	pub fn matcher(&self) -> &TreatmentMatcher {
		&self.matcher
	}

	/// Answers one user query. Collaborator failures become a user-facing fallback phrase.
	pub async fn answer(&self, query: &str) -> Answer {
		let query = query.trim();

		if query.is_empty() {
			return Answer { response: EMPTY_DRAFT_APOLOGY.to_string(), ..Default::default() };
		}

		let cache_key = self.matcher.normalize(query);

		if let Some(mut cached) = self.caches.responses.get(&cache_key) {
			tracing::debug!(query, "Response cache hit.");

			cached.from_cache = true;

			return cached;
		}

		let classification = classify(query);

		match self.answer_uncached(query, &classification).await {
			Ok(answer) => {
				self.caches.responses.put(cache_key, answer.clone());

				answer
			},
			Err(err) => {
				tracing::error!(error = %err, query, "Answer pipeline failed.");

				let response = self.composer().pick(err.fallback_category()).to_string();

				Answer { response, ..Answer::for_query(&classification) }
			},
		}
	}

	/// Direct price lookup for one treatment, answered as `<treatment> BDT`.
	pub async fn lookup_price(&self, treatment: &str) -> Result<Answer> {
		let treatment = treatment.trim();

		if treatment.is_empty() {
			return Err(Error::InvalidRequest { message: "treatment must be non-empty.".to_string() });
		}

		Ok(self.answer(&format!("{treatment} BDT")).await)
	}

	pub fn greeting(&self) -> &'static str {
		self.composer().greeting()
	}

	pub fn clear_caches(&self) {
		self.caches.clear();
		self.matcher.clear();
	}

	async fn answer_uncached(
		&self,
		query: &str,
		classification: &QueryClassification,
	) -> Result<Answer> {
		let mut answer = Answer::for_query(classification);
		let treatment = classification.treatment_name.as_deref();

		if classification.is_direct_price_query
			&& let Some(treatment) = treatment
			&& let Some(price) = self.caches.treatments.get(&self.matcher.normalize(treatment))
		{
			tracing::debug!(treatment, "Treatment price cache hit.");

			answer.response = self.composer().direct_price_response(treatment, &price);
			answer.price = Some(price);

			return Ok(answer);
		}

		let enhanced = enhance_query(query, classification);
		let hits = self.search(&enhanced).await?;
		let threshold = score_threshold(&self.cfg.retrieval, classification.is_price_query);
		let documents = filter_by_score(hits, threshold)
			.into_iter()
			.map(|hit| hit.document)
			.collect::<Vec<_>>();
		let prices = extract_prices(&documents);
		let resolved = treatment.and_then(|treatment| self.matcher.resolve(treatment, &prices));

		answer.price = resolved.map(|(_, price)| price.to_string());

		if classification.is_direct_price_query
			&& let (Some(treatment), Some((_, price))) = (treatment, resolved)
		{
			self.caches.treatments.put(self.matcher.normalize(treatment), price.to_string());

			answer.response = self.compose(true, "", treatment, &prices);

			return Ok(answer);
		}
		if documents.is_empty() {
			let stock = if classification.is_price_query {
				PRICING_UNKNOWN_STOCK_PHRASE
			} else {
				UNCERTAINTY_STOCK_PHRASE
			};

			tracing::info!(query, "No retrieval hit passed the score threshold.");

			answer.response =
				self.compose(false, &format!("{stock}."), treatment.unwrap_or(""), &prices);

			return Ok(answer);
		}

		let context = self.assembler.assemble(&documents, shared_document_type(&documents));
		let prompt = build_prompt(query, classification, &prices, &self.cfg.generation);
		let draft = self.generate(&prompt, &context).await?;

		answer.response = self.compose(
			classification.is_direct_price_query,
			&draft,
			treatment.unwrap_or(""),
			&prices,
		);

		Ok(answer)
	}

	async fn search(&self, query: &str) -> Result<Vec<ScoredDocument>> {
		let key = query.to_string();

		if let Some(hits) = self.caches.searches.get(&key) {
			tracing::debug!(query, "Search cache hit.");

			return Ok(hits);
		}

		let hits = self.collaborators.retriever.search(query, self.cfg.retrieval.search_k).await?;

		self.caches.searches.put(key, hits.clone());

		Ok(hits)
	}

	async fn generate(&self, prompt: &str, context: &str) -> Result<String> {
		let timeout_ms = self.cfg.generation.timeout_ms;
		let generation = self.collaborators.generator.generate(prompt, context);

		match tokio::time::timeout(Duration::from_millis(timeout_ms), generation).await {
			Ok(result) => result,
			Err(_) => Err(Error::Timeout { timeout_ms }),
		}
	}

	fn compose(
		&self,
		is_direct_price: bool,
		draft: &str,
		treatment: &str,
		prices: &PriceMap,
	) -> String {
		let input = ComposeInput {
			draft,
			prices,
			is_direct_price,
			treatment: Some(treatment).filter(|value| !value.is_empty()),
			max_sentences: self.cfg.response.max_sentences,
			matcher: &self.matcher,
		};

		self.composer().compose(&input)
	}

	fn composer(&self) -> MutexGuard<'_, ResponseComposer> {
		self.composer.lock().unwrap_or_else(|err| err.into_inner())
	}
}

/// The document type shared by every document, if they agree on one.
fn shared_document_type(documents: &[RetrievedDocument]) -> Option<&str> {
	let first = documents.first()?.document_type()?;

	documents.iter().all(|document| document.document_type() == Some(first)).then_some(first)
}
