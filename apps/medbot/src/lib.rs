use std::{
	fs,
	path::{Path, PathBuf},
	sync::Arc,
};

use clap::{Parser, Subcommand};
use color_eyre::eyre;

use medbot_config::Config;
use medbot_domain::{
	ContextAssembler, RetrievedDocument, ScoredDocument, classify, extract_prices,
	variation::PRICING_UNKNOWN_STOCK_PHRASE,
};
use medbot_service::{BoxFuture, ChatService, Collaborators, Retriever, TextGenerator};

#[derive(Debug, Parser)]
#[command(
	version = medbot_cli::VERSION,
	rename_all = "kebab",
	styles = medbot_cli::styles(),
)]
pub struct Args {
	/// TOML configuration. Defaults apply when omitted.
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: Option<PathBuf>,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Print how a query is classified, as JSON.
	Classify {
		#[arg(value_name = "QUERY")]
		query: String,
	},
	/// Print the price map extracted from a documents file, as JSON.
	Prices {
		#[arg(long, short = 'd', value_name = "FILE")]
		docs: PathBuf,
	},
	/// Print the generation context assembled from a documents file.
	Context {
		#[arg(long, short = 'd', value_name = "FILE")]
		docs: PathBuf,
		#[arg(long, value_name = "TYPE")]
		doc_type: Option<String>,
	},
	/// Answer a direct price lookup from a documents file.
	Price {
		#[arg(long, short = 'd', value_name = "FILE")]
		docs: PathBuf,
		#[arg(value_name = "TREATMENT")]
		treatment: String,
	},
}

/// Serves every document in the file as a perfect hit.
struct DocumentFileRetriever {
	hits: Vec<ScoredDocument>,
}
impl DocumentFileRetriever {
	fn new(documents: Vec<RetrievedDocument>) -> Self {
		Self {
			hits: documents
				.into_iter()
				.map(|document| ScoredDocument { document, score: 0.0 })
				.collect(),
		}
	}
}
impl Retriever for DocumentFileRetriever {
	fn search<'a>(
		&'a self,
		_query: &'a str,
		k: u32,
	) -> BoxFuture<'a, medbot_service::Result<Vec<ScoredDocument>>> {
		let hits = self.hits.iter().take(k as usize).cloned().collect();

		Box::pin(async move { Ok(hits) })
	}
}

/// Offline stand-in for the language model. It only ever admits the price is unknown.
struct OfflineGenerator;
impl TextGenerator for OfflineGenerator {
	fn generate<'a>(
		&'a self,
		_prompt: &'a str,
		_context: &'a str,
	) -> BoxFuture<'a, medbot_service::Result<String>> {
		Box::pin(async move { Ok(format!("{PRICING_UNKNOWN_STOCK_PHRASE}.")) })
	}
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = match &args.config {
		Some(path) => medbot_config::load(path)?,
		None => Config::default(),
	};

	medbot_cli::init_tracing(&config.service.log_level);

	let output = execute(config, &args.command).await?;

	println!("{output}");

	Ok(())
}

/// Runs one subcommand and returns what it prints.
pub async fn execute(config: Config, command: &Command) -> color_eyre::Result<String> {
	match command {
		Command::Classify { query } => Ok(serde_json::to_string_pretty(&classify(query))?),
		Command::Prices { docs } => {
			let documents = load_documents(docs)?;

			Ok(serde_json::to_string_pretty(&extract_prices(&documents))?)
		},
		Command::Context { docs, doc_type } => {
			let documents = load_documents(docs)?;

			Ok(ContextAssembler::new(&config.context).assemble(&documents, doc_type.as_deref()))
		},
		Command::Price { docs, treatment } => {
			let documents = load_documents(docs)?;
			let collaborators = Collaborators::new(
				Arc::new(DocumentFileRetriever::new(documents)),
				Arc::new(OfflineGenerator),
			);
			let service = ChatService::new(config, collaborators);
			let answer = service.lookup_price(treatment).await?;

			tracing::info!(
				treatment,
				price = answer.price.as_deref().unwrap_or(""),
				"Price lookup finished."
			);

			Ok(serde_json::to_string_pretty(&answer)?)
		},
	}
}

/// Reads a JSON array of `{ "content": ..., "metadata": {...} }` documents.
pub fn load_documents(path: &Path) -> color_eyre::Result<Vec<RetrievedDocument>> {
	let raw = fs::read_to_string(path)
		.map_err(|err| eyre::eyre!("Unable to read documents file at {path:?}: {err}."))?;
	let documents: Vec<RetrievedDocument> = serde_json::from_str(&raw)
		.map_err(|err| eyre::eyre!("Unable to parse documents file at {path:?}: {err}."))?;

	if documents.is_empty() {
		return Err(eyre::eyre!("Documents file must include at least one document."));
	}

	Ok(documents)
}
