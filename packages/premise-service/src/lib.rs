pub mod access;
pub mod add_premise;
pub mod cache;
pub mod embed;
pub mod limiter;
pub mod load;
pub mod retrieve;

mod error;

pub use access::AccessScope;
pub use add_premise::{AddPremiseRequest, AddPremiseResponse};
pub use cache::EmbeddingCache;
pub use embed::{EmbedSettings, EmbeddingClient, Embeddings};
pub use error::{Error, Result};
pub use limiter::{AdmissionLimiter, AdmissionPermit};
pub use load::load_index;
pub use retrieve::{RetrievalOutput, RetrievalRequest, RetrievalStates};

use std::{future::Future, pin::Pin, sync::Arc};

use premise_config::{Config, EmbeddingProviderConfig};
use premise_providers::embedding;
use premise_storage::PremiseIndex;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
}
impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>) -> Self {
		Self { embedding }
	}
}
impl Default for Providers {
	fn default() -> Self {
		Self { embedding: Arc::new(DefaultProviders) }
	}
}

pub struct PremiseService {
	pub cfg: Config,
	pub index: PremiseIndex,
	pub embedder: EmbeddingClient,
}
impl PremiseService {
	pub fn new(cfg: Config, index: PremiseIndex) -> Self {
		Self::with_providers(cfg, index, Providers::default())
	}

	pub fn with_providers(cfg: Config, index: PremiseIndex, providers: Providers) -> Self {
		let embedder = EmbeddingClient::from_config(providers.embedding, &cfg);

		Self::with_embedder(cfg, index, embedder)
	}

	/// Uses a caller-built client, e.g. one sharing a cache or limiter sized for a test.
	pub fn with_embedder(cfg: Config, index: PremiseIndex, embedder: EmbeddingClient) -> Self {
		Self { cfg, index, embedder }
	}

	/// Every premise name in dump order, filtered or not, followed by added premises. Numeric
	/// `local_premises` entries index into this list.
	pub fn indexed_premises(&self) -> Vec<String> {
		self.index.read().corpus().unfiltered_names().to_vec()
	}
}

struct DefaultProviders;
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		Box::pin(async move { Ok(embedding::embed(cfg, texts).await?) })
	}
}
