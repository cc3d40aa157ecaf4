use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use medbot_config::{Config, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_toml_with(section: &str, key: &str, value: Value) -> String {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let table = root
		.as_table_mut()
		.expect("Template config must be a table.")
		.get_mut(section)
		.and_then(Value::as_table_mut)
		.expect("Template config must include the requested section.");

	table.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render template config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("medbot_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn base_config() -> Config {
	medbot_config::parse(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Template config must be valid.")
}

#[test]
fn loads_template_from_disk() {
	let path = write_temp_config(SAMPLE_CONFIG_TEMPLATE_TOML.to_string());
	let result = medbot_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let cfg = result.expect("Expected template config to load.");

	assert_eq!(cfg.service.log_level, "debug");
	assert_eq!(cfg.response.seed, Some(7));
	assert_eq!(cfg.context.max_chars, 4_000);
}

#[test]
fn empty_document_uses_defaults() {
	let cfg = medbot_config::parse("").expect("Empty config must be valid.");

	assert_eq!(cfg.service.log_level, "info");
	assert_eq!(cfg.retrieval.search_k, 20);
	assert_eq!(cfg.context.max_price_documents, 3);
	assert_eq!(cfg.context.max_other_documents, 2);
	assert!((cfg.matching.overlap_threshold - 0.7).abs() < f32::EPSILON);
	assert_eq!(cfg.response.max_sentences, 5);
	assert!(cfg.response.seed.is_none());
	assert_eq!(cfg.cache.treatment_ttl_secs, 172_800);
}

#[test]
fn blank_log_level_falls_back_to_info() {
	let payload = sample_toml_with("service", "log_level", Value::String("  ".to_string()));
	let cfg = medbot_config::parse(&payload).expect("Blank log level must normalize.");

	assert_eq!(cfg.service.log_level, "info");
}

#[test]
fn missing_file_reports_read_error() {
	let mut path = env::temp_dir();

	path.push("medbot_config_test_missing_file.toml");

	let err = medbot_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }), "Unexpected error: {err}");
}

#[test]
fn malformed_toml_reports_parse_error_with_path() {
	let path = write_temp_config("[retrieval\nsearch_k = ".to_string());
	let result = medbot_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	match result.expect_err("Expected parse error.") {
		Error::ParseConfig { path: reported, .. } => assert_eq!(reported, path),
		other => panic!("Unexpected error: {other}"),
	}
}

#[test]
fn search_k_must_be_positive() {
	let payload = sample_toml_with("retrieval", "search_k", Value::Integer(0));
	let err = medbot_config::parse(&payload).expect_err("Expected search_k validation error.");

	assert!(
		err.to_string().contains("retrieval.search_k must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn overlap_threshold_must_be_a_ratio() {
	let mut cfg = base_config();

	cfg.matching.overlap_threshold = 1.5;

	let err = medbot_config::validate(&cfg).expect_err("Expected overlap validation error.");

	assert!(
		err.to_string().contains("matching.overlap_threshold must be in the range (0.0, 1.0]."),
		"Unexpected error: {err}"
	);

	cfg.matching.overlap_threshold = f32::NAN;

	assert!(medbot_config::validate(&cfg).is_err());
}

#[test]
fn context_budget_must_fit_one_document() {
	let mut cfg = base_config();

	cfg.context.max_chars = 100;

	let err = medbot_config::validate(&cfg).expect_err("Expected context validation error.");

	assert!(
		err.to_string().contains("context.max_chars must be at least context.max_document_chars."),
		"Unexpected error: {err}"
	);
}

#[test]
fn probabilities_must_be_in_unit_range() {
	let payload = sample_toml_with("response", "append_probability", Value::Float(1.2));
	let err = medbot_config::parse(&payload).expect_err("Expected probability validation error.");

	assert!(
		err.to_string().contains("response.append_probability must be in the range 0.0-1.0."),
		"Unexpected error: {err}"
	);
}

#[test]
fn cache_ttl_must_be_positive() {
	let mut cfg = base_config();

	cfg.cache.search_ttl_secs = 0;

	let err = medbot_config::validate(&cfg).expect_err("Expected cache TTL validation error.");

	assert!(
		err.to_string().contains("cache.search ttl_secs must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn system_prompts_must_be_non_empty() {
	let payload =
		sample_toml_with("generation", "price_system_prompt", Value::String(" ".to_string()));
	let err = medbot_config::parse(&payload).expect_err("Expected prompt validation error.");

	assert!(
		err.to_string().contains("generation.price_system_prompt must be non-empty."),
		"Unexpected error: {err}"
	);
}
