use serde::{Deserialize, Serialize};

use premise_domain::{LocalPremiseRef, NewPremise, ScoredPremise};
use premise_storage::RowId;

use crate::{
	Error, PremiseService, Result,
	access::{self, AccessScope},
};

/// One proof state or a batch of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RetrievalStates {
	One(String),
	Many(Vec<String>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalRequest {
	pub state: RetrievalStates,
	/// Legacy scoping: every persisted premise of these modules is visible.
	#[serde(default)]
	pub imported_modules: Option<Vec<String>>,
	#[serde(default)]
	pub local_premises: Option<Vec<LocalPremiseRef>>,
	#[serde(default)]
	pub new_premises: Vec<NewPremise>,
	pub k: usize,
}

/// Mirrors the shape of [`RetrievalStates`]: a single state gets a single list back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RetrievalOutput {
	One(Vec<ScoredPremise>),
	Many(Vec<Vec<ScoredPremise>>),
}

impl PremiseService {
	pub async fn retrieve(&self, req: RetrievalRequest) -> Result<RetrievalOutput> {
		let RetrievalRequest { state, imported_modules, local_premises, new_premises, k } = req;

		if k > self.cfg.retrieval.max_k {
			return Err(Error::InvalidArgument {
				message: format!("k must be at most {}, got {k}.", self.cfg.retrieval.max_k),
			});
		}

		let allowed = {
			let arena = self.index.read();

			access::resolve_accessible(
				arena.corpus(),
				AccessScope {
					imported_modules: imported_modules.as_deref(),
					local_premises: local_premises.as_deref(),
					new_premises: &new_premises,
				},
				self.cfg.retrieval.max_new_premises,
			)?
		};

		match state {
			RetrievalStates::One(state) => {
				let mut lists = self.retrieve_core(&[state], &new_premises, k, &allowed).await?;

				Ok(RetrievalOutput::One(lists.pop().unwrap_or_default()))
			},
			RetrievalStates::Many(states) => {
				let lists = self.retrieve_core(&states, &new_premises, k, &allowed).await?;

				Ok(RetrievalOutput::Many(lists))
			},
		}
	}

	/// Scores `states` against the `allowed` persisted rows and the ad-hoc `new_premises`,
	/// returning one list per state, best first, at most `k` long.
	pub async fn retrieve_core(
		&self,
		states: &[String],
		new_premises: &[NewPremise],
		k: usize,
		allowed: &[RowId],
	) -> Result<Vec<Vec<ScoredPremise>>> {
		let decls: Vec<String> = new_premises.iter().map(|premise| premise.decl.clone()).collect();
		let embeddings = self.embedder.embed(states, &decls).await?;
		let arena = self.index.read();
		let hits = arena.vectors().search_restricted(&embeddings.queries, k, allowed)?;
		let mut out = Vec::with_capacity(states.len());

		for (query, indexed) in embeddings.queries.iter().zip(hits) {
			// Ad-hoc candidates go first so they win score ties against persisted premises.
			let mut merged: Vec<ScoredPremise> = new_premises
				.iter()
				.zip(&embeddings.candidates)
				.map(|(premise, vec)| ScoredPremise {
					score: dot(query, vec),
					name: premise.name.clone(),
				})
				.collect();

			merged.extend(indexed.into_iter().filter_map(|(row, score)| {
				arena
					.corpus()
					.premise(row)
					.map(|premise| ScoredPremise { score, name: premise.name.clone() })
			}));

			premise_domain::sort_by_score_desc(&mut merged);
			merged.truncate(k);
			out.push(merged);
		}

		Ok(out)
	}
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
	a.iter().zip(b).map(|(x, y)| x * y).sum()
}
