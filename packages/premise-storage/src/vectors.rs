use std::{
	cmp::{Ordering, Reverse},
	collections::BinaryHeap,
};

use half::f16;

use premise_config::Dtype;

use crate::{Error, Result, RowId};

/// Numeric precision of stored and returned embeddings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Precision {
	#[default]
	Float32,
	Float16,
}
impl Precision {
	/// Rounds `vec` in place to what this precision can represent.
	pub fn round(self, vec: &mut [f32]) {
		if self == Self::Float16 {
			for value in vec.iter_mut() {
				*value = f16::from_f32(*value).to_f32();
			}
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Float32 => "float32",
			Self::Float16 => "float16",
		}
	}
}
impl From<Dtype> for Precision {
	fn from(dtype: Dtype) -> Self {
		match dtype {
			Dtype::Float32 => Self::Float32,
			Dtype::Float16 => Self::Float16,
		}
	}
}

#[derive(Debug)]
enum Rows {
	F32(Vec<f32>),
	F16(Vec<f16>),
}

/// Append-only, row-major matrix of fixed-dimension vectors searched by inner product.
#[derive(Debug)]
pub struct VectorIndex {
	dimensions: usize,
	rows: Rows,
	len: usize,
}
impl VectorIndex {
	pub fn new(dimensions: usize, precision: Precision) -> Self {
		let rows = match precision {
			Precision::Float32 => Rows::F32(Vec::new()),
			Precision::Float16 => Rows::F16(Vec::new()),
		};

		Self { dimensions, rows, len: 0 }
	}

	pub fn dimensions(&self) -> usize {
		self.dimensions
	}

	pub fn precision(&self) -> Precision {
		match self.rows {
			Rows::F32(_) => Precision::Float32,
			Rows::F16(_) => Precision::Float16,
		}
	}

	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	pub fn append(&mut self, vector: &[f32]) -> Result<RowId> {
		self.check_dimensions(vector)?;

		match &mut self.rows {
			Rows::F32(rows) => rows.extend_from_slice(vector),
			Rows::F16(rows) => rows.extend(vector.iter().map(|value| f16::from_f32(*value))),
		}

		let row = self.len;

		self.len += 1;

		Ok(row)
	}

	pub fn score(&self, row: RowId, query: &[f32]) -> Option<f32> {
		if row >= self.len {
			return None;
		}

		let start = row * self.dimensions;
		let end = start + self.dimensions;
		let score: f32 = match &self.rows {
			Rows::F32(rows) => rows[start..end].iter().zip(query).map(|(a, b)| a * b).sum(),
			Rows::F16(rows) =>
				rows[start..end].iter().zip(query).map(|(a, b)| a.to_f32() * b).sum(),
		};

		Some(score)
	}

	/// Top-`k` rows by inner product for each query, considering only `allowed` rows.
	///
	/// Lists are ordered by score descending with ties going to the lower row id, and may be
	/// shorter than `k` when fewer rows are eligible.
	pub fn search_restricted(
		&self,
		queries: &[Vec<f32>],
		k: usize,
		allowed: &[RowId],
	) -> Result<Vec<Vec<(RowId, f32)>>> {
		let mut out = Vec::with_capacity(queries.len());

		for query in queries {
			self.check_dimensions(query)?;

			out.push(self.search_one(query, k, allowed));
		}

		Ok(out)
	}

	fn search_one(&self, query: &[f32], k: usize, allowed: &[RowId]) -> Vec<(RowId, f32)> {
		if k == 0 || allowed.is_empty() {
			return Vec::new();
		}

		let mut heap = BinaryHeap::with_capacity(k.min(allowed.len()).saturating_add(1));

		for &row in allowed {
			let Some(score) = self.score(row, query) else {
				continue;
			};

			heap.push(Reverse(ScoredRow { score, row }));

			if heap.len() > k {
				heap.pop();
			}
		}

		heap.into_sorted_vec().into_iter().map(|Reverse(hit)| (hit.row, hit.score)).collect()
	}

	fn check_dimensions(&self, vector: &[f32]) -> Result<()> {
		if vector.len() != self.dimensions {
			return Err(Error::DimensionMismatch {
				expected: self.dimensions,
				actual: vector.len(),
			});
		}

		Ok(())
	}
}

#[derive(Debug, Clone, Copy)]
struct ScoredRow {
	score: f32,
	row: RowId,
}
impl PartialEq for ScoredRow {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}
impl Eq for ScoredRow {}
impl PartialOrd for ScoredRow {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}
impl Ord for ScoredRow {
	// A lower row id ranks higher on equal scores.
	fn cmp(&self, other: &Self) -> Ordering {
		self.score.total_cmp(&other.score).then_with(|| other.row.cmp(&self.row))
	}
}
