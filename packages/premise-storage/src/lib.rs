//! Process-lifetime storage for the premise corpus and its vector index.
//!
//! Corpus rows and vector rows live in one [`PremiseIndex`] arena. Readers share a read guard;
//! [`PremiseIndex::append`] is the only mutation and takes the write guard, so a premise and its
//! vector always land on the same row.

pub mod corpus;
pub mod matrix;
pub mod vectors;

mod error;

pub use corpus::Corpus;
pub use error::{Error, Result};
pub use vectors::{Precision, VectorIndex};

use parking_lot::{RwLock, RwLockReadGuard};

use premise_domain::{Premise, dump::Declarations};

pub type RowId = usize;

#[derive(Debug)]
pub struct Arena {
	corpus: Corpus,
	vectors: VectorIndex,
	version: u64,
}
impl Arena {
	pub fn corpus(&self) -> &Corpus {
		&self.corpus
	}

	pub fn vectors(&self) -> &VectorIndex {
		&self.vectors
	}

	/// Bumped by every append.
	pub fn version(&self) -> u64 {
		self.version
	}
}

/// Outcome of [`PremiseIndex::append`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Appended {
	pub row: RowId,
	pub version: u64,
	/// `false` when an existing row was returned instead of appending.
	pub added: bool,
}

#[derive(Debug)]
pub struct PremiseIndex {
	arena: RwLock<Arena>,
}
impl PremiseIndex {
	/// Builds the arena from parsed declarations and one embedding per indexed premise.
	pub fn build(
		declarations: Declarations,
		embeddings: Vec<Vec<f32>>,
		dimensions: usize,
		precision: Precision,
	) -> Result<Self> {
		let Declarations { premises, unfiltered_names } = declarations;

		if premises.len() != embeddings.len() {
			return Err(Error::RowCountMismatch {
				premises: premises.len(),
				vectors: embeddings.len(),
			});
		}

		let mut vectors = VectorIndex::new(dimensions, precision);

		for embedding in &embeddings {
			vectors.append(embedding)?;
		}

		let corpus = Corpus::new(premises, unfiltered_names);

		tracing::info!(
			rows = corpus.len(),
			unfiltered = corpus.unfiltered_names().len(),
			dimensions,
			precision = precision.as_str(),
			"Premise index built."
		);

		Ok(Self { arena: RwLock::new(Arena { corpus, vectors, version: 0 }) })
	}

	pub fn read(&self) -> RwLockReadGuard<'_, Arena> {
		self.arena.read()
	}

	pub fn len(&self) -> usize {
		self.arena.read().corpus.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Appends one premise and its embedding as a new row.
	///
	/// The vector is validated before the corpus is touched, so a failed append leaves both sides
	/// unchanged.
	pub fn append(&self, premise: Premise, embedding: &[f32]) -> Result<Appended> {
		let mut arena = self.arena.write();

		Self::append_locked(&mut arena, premise, embedding)
	}

	/// Like [`PremiseIndex::append`], but returns the existing row when the premise's module
	/// already holds a premise of the same name. The check and the append share one write guard.
	pub fn append_if_absent(&self, premise: Premise, embedding: &[f32]) -> Result<Appended> {
		let mut arena = self.arena.write();

		if let Some(row) = arena.corpus.module_row(&premise.module, &premise.name) {
			return Ok(Appended { row, version: arena.version, added: false });
		}

		Self::append_locked(&mut arena, premise, embedding)
	}

	fn append_locked(arena: &mut Arena, premise: Premise, embedding: &[f32]) -> Result<Appended> {
		let row = arena.vectors.append(embedding)?;
		let corpus_row = arena.corpus.push(premise);

		debug_assert_eq!(row, corpus_row);

		arena.version += 1;

		Ok(Appended { row, version: arena.version, added: true })
	}
}
