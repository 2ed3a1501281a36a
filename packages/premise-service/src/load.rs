use std::{fs::File, io::BufReader};

use premise_config::Config;
use premise_domain::{
	Premise,
	dump::{self, NameFilter},
};
use premise_storage::{Precision, PremiseIndex, matrix};

use crate::{EmbeddingProvider, Error, Result};

/// Reads the declaration dump and builds the index, taking vectors from the precomputed matrix
/// when one is configured and from `provider` otherwise.
pub async fn load_index(cfg: &Config, provider: &dyn EmbeddingProvider) -> Result<PremiseIndex> {
	let filter = NameFilter::new(&cfg.corpus.exclude_name_patterns)?;
	let file = File::open(&cfg.corpus.path).map_err(|err| Error::Storage {
		message: format!("Failed to open {}: {err}", cfg.corpus.path.display()),
	})?;
	let declarations = dump::parse(BufReader::new(file), &filter)?;

	tracing::info!(
		path = %cfg.corpus.path.display(),
		indexed = declarations.premises.len(),
		unfiltered = declarations.unfiltered_names.len(),
		"Corpus loaded."
	);

	let dimensions = cfg.providers.embedding.dimensions as usize;
	let precision = Precision::from(cfg.embedding.dtype);
	let embeddings = match &cfg.corpus.embeddings_path {
		Some(path) => matrix::read_f32_matrix(path, dimensions)?,
		None => encode_premises(cfg, provider, &declarations.premises).await?,
	};

	Ok(PremiseIndex::build(declarations, embeddings, dimensions, precision)?)
}

async fn encode_premises(
	cfg: &Config,
	provider: &dyn EmbeddingProvider,
	premises: &[Premise],
) -> Result<Vec<Vec<f32>>> {
	let texts: Vec<String> = premises.iter().map(|premise| premise.text().to_string()).collect();
	let mut out = Vec::with_capacity(texts.len());

	for chunk in texts.chunks(cfg.embedding.max_batch_size.max(1)) {
		let vecs = provider.embed(&cfg.providers.embedding, chunk).await?;

		if vecs.len() != chunk.len() {
			return Err(Error::Backend {
				message: format!(
					"Embedding backend returned {} vectors for {} inputs.",
					vecs.len(),
					chunk.len()
				),
			});
		}

		out.extend(vecs);

		tracing::debug!(encoded = out.len(), total = texts.len(), "Encoding corpus.");
	}

	Ok(out)
}
