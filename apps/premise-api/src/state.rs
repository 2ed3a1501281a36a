use std::sync::Arc;

use premise_config::Config;
use premise_service::{PremiseService, Providers};
use premise_storage::PremiseIndex;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<PremiseService>,
}
impl AppState {
	/// Loads the corpus, builds the index, and wires the default embedding backend.
	pub async fn new(config: Config) -> color_eyre::Result<Self> {
		let providers = Providers::default();
		let index = premise_service::load_index(&config, &*providers.embedding).await?;

		Ok(Self::from_parts(config, index, providers))
	}

	pub fn from_parts(config: Config, index: PremiseIndex, providers: Providers) -> Self {
		Self { service: Arc::new(PremiseService::with_providers(config, index, providers)) }
	}
}
