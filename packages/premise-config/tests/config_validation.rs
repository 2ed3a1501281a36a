use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use premise_config::{Config, Dispatch, Dtype, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_toml_with(section: &str, key: &str, value: Value) -> String {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let table = root
		.as_table_mut()
		.expect("Template config must be a table.")
		.get_mut(section)
		.and_then(Value::as_table_mut)
		.unwrap_or_else(|| panic!("Template config must include [{section}]."));

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

	path.push(format!("premise_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String) -> premise_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = premise_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn base_config() -> Config {
	toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse test config.")
}

#[test]
fn sample_config_loads_and_normalizes() {
	let cfg = load_payload(SAMPLE_CONFIG_TEMPLATE_TOML.to_string())
		.expect("Sample config should be valid.");

	assert_eq!(cfg.providers.embedding.api_base, "http://127.0.0.1:8081");
	assert!(cfg.providers.embedding.api_key.is_none(), "Blank api_key should normalize to None.");
	assert_eq!(cfg.embedding.dispatch, Dispatch::Sequential);
	assert_eq!(cfg.embedding.dtype, Dtype::Float32);
	assert!(!cfg.admin.enable_add_premise);
	assert!(cfg.corpus.embeddings_path.is_none());
}

#[test]
fn float16_and_concurrent_dispatch_parse() {
	let payload = sample_toml_with("embedding", "dtype", Value::String("float16".to_string()));
	let mut cfg: Config = toml::from_str(&payload).expect("Failed to parse config.");

	assert_eq!(cfg.embedding.dtype, Dtype::Float16);

	let payload =
		sample_toml_with("embedding", "dispatch", Value::String("concurrent".to_string()));

	cfg = toml::from_str(&payload).expect("Failed to parse config.");

	assert_eq!(cfg.embedding.dispatch, Dispatch::Concurrent);
}

#[test]
fn unknown_dtype_is_a_parse_error() {
	let payload = sample_toml_with("embedding", "dtype", Value::String("bfloat16".to_string()));
	let err = load_payload(payload).expect_err("Expected dtype parse error.");

	assert!(matches!(err, Error::ParseConfig { .. }), "Unexpected error: {err:?}");
}

#[test]
fn cache_capacity_must_be_positive() {
	let payload = sample_toml_with("embedding", "cache_capacity", Value::Integer(0));
	let err = load_payload(payload).expect_err("Expected cache capacity validation error.");

	assert!(
		err.to_string().contains("embedding.cache_capacity must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn batch_size_must_fit_within_admission_budget() {
	let payload = sample_toml_with("embedding", "max_batch_size", Value::Integer(65));
	let err = load_payload(payload).expect_err("Expected batch size validation error.");

	assert!(
		err.to_string()
			.contains("embedding.max_batch_size must not exceed embedding.max_concurrent_inputs."),
		"Unexpected error: {err}"
	);
}

#[test]
fn max_k_must_be_positive() {
	let mut cfg = base_config();

	cfg.retrieval.max_k = 0;

	let err = premise_config::validate(&cfg).expect_err("Expected max_k validation error.");

	assert!(err.to_string().contains("retrieval.max_k must be greater than zero."));
}

#[test]
fn exclude_patterns_must_compile() {
	let mut cfg = base_config();

	cfg.corpus.exclude_name_patterns = vec!["(unclosed".to_string()];

	let err = premise_config::validate(&cfg).expect_err("Expected pattern validation error.");

	assert!(matches!(err, Error::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"));
}

#[test]
fn default_headers_must_be_strings() {
	let mut cfg = base_config();

	cfg.providers.embedding.default_headers.insert("x-retries".to_string(), 3.into());

	let err = premise_config::validate(&cfg).expect_err("Expected header validation error.");

	assert!(
		err.to_string().contains("providers.embedding.default_headers.x-retries must be a string."),
		"Unexpected error: {err}"
	);
}

#[test]
fn missing_file_reports_path() {
	let path = PathBuf::from("/nonexistent/premise.toml");
	let err = premise_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }));
}
