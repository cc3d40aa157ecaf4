mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Cache, Config, Context, DEFAULT_GENERAL_SYSTEM_PROMPT, DEFAULT_PRICE_SYSTEM_PROMPT, Generation,
	Matching, Response, Retrieval, Service,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	parse(&raw).map_err(|err| match err {
		Error::ParseConfig { source, .. } => Error::ParseConfig { path: path.to_path_buf(), source },
		other => other,
	})
}

/// Parses, normalizes, and validates a TOML document. Missing sections take their defaults.
pub fn parse(raw: &str) -> Result<Config> {
	let mut cfg: Config = toml::from_str(raw)
		.map_err(|err| Error::ParseConfig { path: Default::default(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.retrieval.search_k == 0 {
		return Err(Error::invalid("retrieval.search_k", "must be greater than zero."));
	}

	for (field, value) in [
		("retrieval.score_threshold", cfg.retrieval.score_threshold),
		("retrieval.price_score_threshold", cfg.retrieval.price_score_threshold),
	] {
		if !value.is_finite() {
			return Err(Error::invalid(field, "must be a finite number."));
		}
		if value < 0.0 {
			return Err(Error::invalid(field, "must be zero or greater."));
		}
	}

	if cfg.context.max_document_chars == 0 {
		return Err(Error::invalid("context.max_document_chars", "must be greater than zero."));
	}
	if cfg.context.max_chars < cfg.context.max_document_chars {
		return Err(Error::invalid(
			"context.max_chars",
			"must be at least context.max_document_chars.",
		));
	}
	if cfg.context.max_price_documents == 0 && cfg.context.max_other_documents == 0 {
		return Err(Error::invalid(
			"context.max_price_documents",
			"and context.max_other_documents cannot both be zero.",
		));
	}

	let threshold = cfg.matching.overlap_threshold;

	if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
		return Err(Error::invalid("matching.overlap_threshold", "must be in the range (0.0, 1.0]."));
	}
	if cfg.matching.normalize_cache_size == 0 {
		return Err(Error::invalid("matching.normalize_cache_size", "must be greater than zero."));
	}
	if cfg.matching.match_cache_size == 0 {
		return Err(Error::invalid("matching.match_cache_size", "must be greater than zero."));
	}
	if cfg.response.max_sentences == 0 {
		return Err(Error::invalid("response.max_sentences", "must be greater than zero."));
	}

	for (field, value) in [
		("response.prepend_probability", cfg.response.prepend_probability),
		("response.append_probability", cfg.response.append_probability),
	] {
		if !(0.0..=1.0).contains(&value) {
			return Err(Error::invalid(field, "must be in the range 0.0-1.0."));
		}
	}

	for (field, capacity, ttl) in [
		("cache.response", cfg.cache.response_capacity, cfg.cache.response_ttl_secs),
		("cache.search", cfg.cache.search_capacity, cfg.cache.search_ttl_secs),
		("cache.treatment", cfg.cache.treatment_capacity, cfg.cache.treatment_ttl_secs),
	] {
		if capacity == 0 {
			return Err(Error::invalid(field, "capacity must be greater than zero."));
		}
		if ttl == 0 {
			return Err(Error::invalid(field, "ttl_secs must be greater than zero."));
		}
	}

	if cfg.generation.timeout_ms == 0 {
		return Err(Error::invalid("generation.timeout_ms", "must be greater than zero."));
	}

	for (field, prompt) in [
		("generation.general_system_prompt", &cfg.generation.general_system_prompt),
		("generation.price_system_prompt", &cfg.generation.price_system_prompt),
	] {
		if prompt.trim().is_empty() {
			return Err(Error::invalid(field, "must be non-empty."));
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let level = cfg.service.log_level.trim();

	cfg.service.log_level = if level.is_empty() { "info".to_string() } else { level.to_string() };
	cfg.generation.general_system_prompt = cfg.generation.general_system_prompt.trim().to_string();
	cfg.generation.price_system_prompt = cfg.generation.price_system_prompt.trim().to_string();
}
