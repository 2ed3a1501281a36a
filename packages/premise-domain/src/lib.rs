pub mod dump;

mod error;

pub use error::{Error, Result};

use serde::{Deserialize, Serialize};

/// A named declaration eligible for retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Premise {
	pub name: String,
	pub module: String,
	/// Canonical rendering sent to the embedding backend.
	pub decl: String,
}
impl Premise {
	pub fn new(
		name: impl Into<String>,
		module: impl Into<String>,
		decl: impl Into<String>,
	) -> Self {
		Self { name: name.into(), module: module.into(), decl: decl.into() }
	}

	pub fn text(&self) -> &str {
		&self.decl
	}
}

/// A request-scoped premise supplied by the caller. Shadows a persisted premise of the same name
/// for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPremise {
	pub name: String,
	pub decl: String,
}

/// An entry of a request's `local_premises` list.
///
/// Clients may send either the premise name or its position in the unfiltered premise listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalPremiseRef {
	ByRowRef(i64),
	ByName(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPremise {
	pub score: f32,
	pub name: String,
}

/// Sorts by score, highest first. Equal scores keep their input order.
pub fn sort_by_score_desc(items: &mut [ScoredPremise]) {
	items.sort_by(|a, b| b.score.total_cmp(&a.score));
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn local_premise_refs_accept_names_and_indexes() {
		let refs: Vec<LocalPremiseRef> =
			serde_json::from_str(r#"["Nat.add_comm", 3, "List.map"]"#).expect("parse failed");

		assert_eq!(
			refs,
			vec![
				LocalPremiseRef::ByName("Nat.add_comm".to_string()),
				LocalPremiseRef::ByRowRef(3),
				LocalPremiseRef::ByName("List.map".to_string()),
			]
		);
	}

	#[test]
	fn score_sort_is_stable_for_ties() {
		let mut items = vec![
			ScoredPremise { score: 0.5, name: "a".to_string() },
			ScoredPremise { score: 0.9, name: "b".to_string() },
			ScoredPremise { score: 0.5, name: "c".to_string() },
		];

		sort_by_score_desc(&mut items);

		let names: Vec<_> = items.iter().map(|item| item.name.as_str()).collect();

		assert_eq!(names, ["b", "a", "c"]);
	}
}
