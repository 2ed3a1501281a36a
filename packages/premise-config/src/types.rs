use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub corpus: Corpus,
	pub providers: Providers,
	pub embedding: Embedding,
	pub retrieval: Retrieval,
	#[serde(default)]
	pub admin: Admin,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Corpus {
	/// JSON lines declaration dump, one `{name, module, decl}` record per line.
	pub path: PathBuf,
	/// Optional. Raw little-endian `f32` matrix with one row per indexed premise. When absent the
	/// corpus is encoded through the embedding provider at startup.
	pub embeddings_path: Option<PathBuf>,
	/// Premises whose names match any of these patterns stay addressable by numeric reference but
	/// are not indexed.
	#[serde(default)]
	pub exclude_name_patterns: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub api_base: String,
	#[serde(default = "default_embed_path")]
	pub path: String,
	pub api_key: Option<String>,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default = "default_truncate")]
	pub truncate: bool,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Embedding {
	pub cache_capacity: usize,
	pub max_concurrent_inputs: usize,
	pub max_batch_size: usize,
	#[serde(default)]
	pub dispatch: Dispatch,
	#[serde(default)]
	pub dtype: Dtype,
}

/// How the chunks of one embed call are sent to the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dispatch {
	#[default]
	Sequential,
	/// All chunks in flight at once. Raises backend parallelism at the cost of more admission
	/// rejections, since the chunks race for the same budget.
	Concurrent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dtype {
	#[default]
	Float32,
	Float16,
}

#[derive(Debug, Deserialize)]
pub struct Retrieval {
	pub max_k: usize,
	pub max_new_premises: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Admin {
	/// Exposes the incremental insert route. Intended for tests and benchmarks only.
	pub enable_add_premise: bool,
}

fn default_embed_path() -> String {
	"/embed".to_string()
}

fn default_truncate() -> bool {
	true
}
