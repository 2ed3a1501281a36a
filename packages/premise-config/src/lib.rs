mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Admin, Config, Corpus, Dispatch, Dtype, Embedding, EmbeddingProviderConfig, Providers,
	Retrieval, Service,
};

use std::{fs, path::Path};

use regex::Regex;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.providers.embedding.api_base.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.embedding.api_base must be non-empty.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (key, value) in &cfg.providers.embedding.default_headers {
		if !value.is_string() {
			return Err(Error::Validation {
				message: format!("providers.embedding.default_headers.{key} must be a string."),
			});
		}
	}

	if cfg.embedding.cache_capacity == 0 {
		return Err(Error::Validation {
			message: "embedding.cache_capacity must be greater than zero.".to_string(),
		});
	}
	if cfg.embedding.max_concurrent_inputs == 0 {
		return Err(Error::Validation {
			message: "embedding.max_concurrent_inputs must be greater than zero.".to_string(),
		});
	}
	if cfg.embedding.max_batch_size == 0 {
		return Err(Error::Validation {
			message: "embedding.max_batch_size must be greater than zero.".to_string(),
		});
	}
	if cfg.embedding.max_batch_size > cfg.embedding.max_concurrent_inputs {
		return Err(Error::Validation {
			message:
				"embedding.max_batch_size must not exceed embedding.max_concurrent_inputs."
					.to_string(),
		});
	}
	if cfg.retrieval.max_k == 0 {
		return Err(Error::Validation {
			message: "retrieval.max_k must be greater than zero.".to_string(),
		});
	}

	for pattern in &cfg.corpus.exclude_name_patterns {
		Regex::new(pattern)
			.map_err(|err| Error::InvalidPattern { pattern: pattern.clone(), source: err })?;
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.providers.embedding.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false)
	{
		cfg.providers.embedding.api_key = None;
	}

	cfg.providers.embedding.api_base =
		cfg.providers.embedding.api_base.trim_end_matches('/').to_string();
	cfg.corpus.exclude_name_patterns.retain(|pattern| !pattern.trim().is_empty());
}
