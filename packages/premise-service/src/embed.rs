use std::{sync::Arc, time::Duration};

use futures::future;

use premise_config::{Config, Dispatch, EmbeddingProviderConfig};
use premise_storage::Precision;

use crate::{AdmissionLimiter, EmbeddingCache, EmbeddingProvider, Error, Result};

/// Knobs of [`EmbeddingClient`] that do not belong to the backend itself.
#[derive(Debug, Clone, Copy)]
pub struct EmbedSettings {
	pub max_batch_size: usize,
	pub dispatch: Dispatch,
	pub precision: Precision,
}
impl EmbedSettings {
	pub fn from_config(cfg: &Config) -> Self {
		Self {
			max_batch_size: cfg.embedding.max_batch_size,
			dispatch: cfg.embedding.dispatch,
			precision: cfg.embedding.dtype.into(),
		}
	}
}

#[derive(Debug, Default)]
pub struct Embeddings {
	pub queries: Vec<Vec<f32>>,
	pub candidates: Vec<Vec<f32>>,
}

/// Batches texts to the embedding backend under admission control, caching candidate texts.
pub struct EmbeddingClient {
	provider: Arc<dyn EmbeddingProvider>,
	provider_cfg: EmbeddingProviderConfig,
	cache: EmbeddingCache,
	limiter: AdmissionLimiter,
	settings: EmbedSettings,
}
impl EmbeddingClient {
	pub fn new(
		provider: Arc<dyn EmbeddingProvider>,
		provider_cfg: EmbeddingProviderConfig,
		cache: EmbeddingCache,
		limiter: AdmissionLimiter,
		settings: EmbedSettings,
	) -> Self {
		Self { provider, provider_cfg, cache, limiter, settings }
	}

	pub fn from_config(provider: Arc<dyn EmbeddingProvider>, cfg: &Config) -> Self {
		Self::new(
			provider,
			cfg.providers.embedding.clone(),
			EmbeddingCache::new(cfg.embedding.cache_capacity),
			AdmissionLimiter::new(cfg.embedding.max_concurrent_inputs),
			EmbedSettings::from_config(cfg),
		)
	}

	pub fn cache(&self) -> &EmbeddingCache {
		&self.cache
	}

	pub fn limiter(&self) -> &AdmissionLimiter {
		&self.limiter
	}

	pub fn dimensions(&self) -> usize {
		self.provider_cfg.dimensions as usize
	}

	/// Embeds `queries` and `candidates` in one pass.
	///
	/// Queries always go to the backend. Candidates are served from the cache when possible and
	/// the ones that are not are cached once embedded. Both outputs keep their input order.
	pub async fn embed(&self, queries: &[String], candidates: &[String]) -> Result<Embeddings> {
		if queries.is_empty() {
			return Err(Error::InvalidArgument { message: "empty list of states".to_string() });
		}

		let mut candidate_vecs: Vec<Option<Vec<f32>>> =
			candidates.iter().map(|text| self.cache.lookup(text)).collect();
		let mut texts = queries.to_vec();
		let mut misses = Vec::new();

		for (idx, (text, cached)) in candidates.iter().zip(&candidate_vecs).enumerate() {
			if cached.is_none() {
				texts.push(text.clone());
				misses.push(idx);
			}
		}

		tracing::info!(
			received = queries.len() + candidates.len(),
			embedding = texts.len(),
			"Embedding request."
		);

		let mut rows = self.embed_texts(&texts, queries.len()).await?.into_iter();
		let queries = rows.by_ref().take(queries.len()).collect();

		for (idx, vec) in misses.into_iter().zip(rows) {
			candidate_vecs[idx] = Some(vec);
		}

		let candidates = candidate_vecs.into_iter().map(Option::unwrap_or_default).collect();

		Ok(Embeddings { queries, candidates })
	}

	/// Sends `texts` in chunks and returns one vector per text. Texts from position
	/// `cache_from` on are written to the cache.
	async fn embed_texts(&self, texts: &[String], cache_from: usize) -> Result<Vec<Vec<f32>>> {
		let batch_size = self.settings.max_batch_size.max(1);
		let chunks = texts.chunks(batch_size).enumerate().map(|(i, chunk)| {
			let offset = i * batch_size;

			(chunk, cache_from.saturating_sub(offset))
		});
		let batches = match self.settings.dispatch {
			Dispatch::Sequential => {
				let mut batches = Vec::new();

				for (chunk, chunk_cache_from) in chunks {
					batches.push(self.embed_chunk(chunk, chunk_cache_from).await?);
				}

				batches
			},
			Dispatch::Concurrent => {
				let pending = chunks.map(|(chunk, from)| self.embed_chunk(chunk, from));

				future::try_join_all(pending).await?
			},
		};

		Ok(batches.into_iter().flatten().collect())
	}

	async fn embed_chunk(&self, chunk: &[String], cache_from: usize) -> Result<Vec<Vec<f32>>> {
		let permit = self.limiter.try_acquire(chunk.len())?;
		let timeout = Duration::from_millis(self.provider_cfg.timeout_ms);
		let outcome =
			tokio::time::timeout(timeout, self.provider.embed(&self.provider_cfg, chunk)).await;

		drop(permit);

		let mut vecs = match outcome {
			Ok(result) => result?,
			Err(_) => {
				tracing::warn!(
					timeout_ms = self.provider_cfg.timeout_ms,
					inputs = chunk.len(),
					"Embedding call timed out."
				);

				return Err(Error::Backend {
					message: format!(
						"Embedding backend did not answer within {} ms.",
						self.provider_cfg.timeout_ms
					),
				});
			},
		};

		self.check_shape(&vecs, chunk.len())?;

		for (idx, vec) in vecs.iter_mut().enumerate() {
			self.settings.precision.round(vec);

			if idx >= cache_from {
				self.cache.insert(chunk[idx].clone(), vec.clone());
			}
		}

		Ok(vecs)
	}

	fn check_shape(&self, vecs: &[Vec<f32>], expected: usize) -> Result<()> {
		if vecs.len() != expected {
			return Err(Error::Backend {
				message: format!(
					"Embedding backend returned {} vectors for {expected} inputs.",
					vecs.len()
				),
			});
		}

		let dimensions = self.dimensions();

		if let Some(bad) = vecs.iter().find(|vec| vec.len() != dimensions) {
			return Err(Error::Backend {
				message: format!(
					"Embedding backend returned a {}-dimensional vector, expected {dimensions}.",
					bad.len()
				),
			});
		}

		Ok(())
	}
}
