use std::collections::HashMap;

use premise_domain::Premise;

use crate::RowId;

/// Ordered premises plus the lookups retrieval needs. Position in `premises` is the row id.
#[derive(Debug, Default)]
pub struct Corpus {
	premises: Vec<Premise>,
	unfiltered_names: Vec<String>,
	name_to_row: HashMap<String, RowId>,
	module_rows: HashMap<String, HashMap<String, RowId>>,
}
impl Corpus {
	pub fn new(premises: Vec<Premise>, unfiltered_names: Vec<String>) -> Self {
		let mut corpus = Self { unfiltered_names, ..Default::default() };

		for premise in premises {
			corpus.push_indexed(premise);
		}

		corpus
	}

	pub fn len(&self) -> usize {
		self.premises.len()
	}

	pub fn is_empty(&self) -> bool {
		self.premises.is_empty()
	}

	pub fn premise(&self, row: RowId) -> Option<&Premise> {
		self.premises.get(row)
	}

	pub fn premises(&self) -> &[Premise] {
		&self.premises
	}

	/// Row currently answering to `name`. A later premise with the same name shadows an earlier
	/// one.
	pub fn row_of(&self, name: &str) -> Option<RowId> {
		self.name_to_row.get(name).copied()
	}

	pub fn contains(&self, name: &str) -> bool {
		self.name_to_row.contains_key(name)
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.name_to_row.keys().map(String::as_str)
	}

	pub fn module_names(&self, module: &str) -> impl Iterator<Item = &str> {
		self.module_rows.get(module).into_iter().flat_map(|rows| rows.keys()).map(String::as_str)
	}

	pub fn module_contains(&self, module: &str, name: &str) -> bool {
		self.module_row(module, name).is_some()
	}

	/// Latest row holding `name` within `module`, regardless of rows added elsewhere under the
	/// same name.
	pub fn module_row(&self, module: &str, name: &str) -> Option<RowId> {
		self.module_rows.get(module)?.get(name).copied()
	}

	pub fn unfiltered_names(&self) -> &[String] {
		&self.unfiltered_names
	}

	/// Resolves a position in the unfiltered listing. Negative or out-of-range positions resolve
	/// to nothing.
	pub fn unfiltered_name(&self, position: i64) -> Option<&str> {
		let position = usize::try_from(position).ok()?;

		self.unfiltered_names.get(position).map(String::as_str)
	}

	pub(crate) fn push(&mut self, premise: Premise) -> RowId {
		self.unfiltered_names.push(premise.name.clone());

		self.push_indexed(premise)
	}

	fn push_indexed(&mut self, premise: Premise) -> RowId {
		let row = self.premises.len();

		self.name_to_row.insert(premise.name.clone(), row);
		self.module_rows
			.entry(premise.module.clone())
			.or_default()
			.insert(premise.name.clone(), row);
		self.premises.push(premise);

		row
	}
}
