use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use recs_config::{Config, Error, VectorBackend};

const SAMPLE_CONFIG_TOML: &str = include_str!("fixtures/sample_config.toml");

fn sample_with(section: &str, key: &str, value: Value) -> String {
	let mut root: Value = toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.");
	let mut table = root.as_table_mut().expect("Sample config must be a table.");

	for part in section.split('.') {
		table = table
			.get_mut(part)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Sample config must include [{section}]."));
	}

	table.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render sample config.")
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

	path.push(format!("recs_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String) -> recs_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = recs_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn expect_validation(payload: String, needle: &str) {
	let err = load_payload(payload).expect_err("Expected validation error.");

	assert!(matches!(err, Error::Validation { .. }), "Unexpected error kind: {err:?}");

	let message = err.to_string();

	assert!(message.contains(needle), "Unexpected error message: {message}");
}

#[test]
fn sample_config_loads_and_normalizes() {
	let cfg = load_payload(SAMPLE_CONFIG_TOML.to_string()).expect("Sample config must load.");

	assert_eq!(cfg.providers.embedding.api_base, "https://api.openai.com/v1");
	assert_eq!(cfg.providers.embedding.max_input_chars, 7_500);
	assert_eq!(cfg.storage.vector.backend, VectorBackend::Qdrant);
	assert_eq!(cfg.recommend.text_top_k, 3);
	assert_eq!(cfg.trending.window_days, 10);
}

#[test]
fn optional_sections_fall_back_to_defaults() {
	let mut root: Value = toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.");
	let table = root.as_table_mut().expect("Sample config must be a table.");

	table.remove("recommend");
	table.remove("trending");

	let cfg = load_payload(toml::to_string(&root).expect("Failed to render config."))
		.expect("Config without optional sections must load.");

	assert_eq!(cfg.recommend.profile_top_k, 50);
	assert_eq!(cfg.recommend.default_page_size, 12);
	assert_eq!(cfg.trending.limit, 10);
	assert_eq!(cfg.trending.popular_tags_limit, 9);
}

#[test]
fn memory_backend_is_accepted() {
	let payload = sample_with("storage.vector", "backend", Value::String("memory".to_string()));
	let cfg = load_payload(payload).expect("Memory backend must load.");

	assert_eq!(cfg.storage.vector.backend, VectorBackend::Memory);
}

#[test]
fn embedding_dimensions_must_be_positive() {
	expect_validation(
		sample_with("providers.embedding", "dimensions", Value::Integer(0)),
		"providers.embedding.dimensions must be greater than zero.",
	);
}

#[test]
fn embedding_dimensions_must_match_vector_dim() {
	expect_validation(
		sample_with("providers.embedding", "dimensions", Value::Integer(1_536)),
		"providers.embedding.dimensions must match storage.qdrant.vector_dim.",
	);
}

#[test]
fn max_input_chars_must_be_positive() {
	expect_validation(
		sample_with("providers.embedding", "max_input_chars", Value::Integer(0)),
		"providers.embedding.max_input_chars must be greater than zero.",
	);
}

#[test]
fn api_key_must_be_non_empty() {
	expect_validation(
		sample_with("providers.embedding", "api_key", Value::String("  ".to_string())),
		"Provider embedding api_key must be non-empty.",
	);
}

#[test]
fn top_k_and_window_must_be_positive() {
	expect_validation(
		sample_with("recommend", "profile_top_k", Value::Integer(0)),
		"recommend.profile_top_k must be greater than zero.",
	);
	expect_validation(
		sample_with("trending", "window_days", Value::Integer(0)),
		"trending.window_days must be greater than zero.",
	);
}

#[test]
fn default_page_size_must_fit_max_page_size() {
	expect_validation(
		sample_with("recommend", "default_page_size", Value::Integer(500)),
		"recommend.default_page_size must not exceed recommend.max_page_size.",
	);
}

#[test]
fn missing_file_reports_read_error() {
	let err = recs_config::load(&PathBuf::from("/nonexistent/recs.toml"))
		.expect_err("Expected read error.");

	assert!(matches!(err, Error::Read { .. }));
}
