use std::collections::HashSet;

use premise_domain::{LocalPremiseRef, NewPremise};
use premise_storage::{Corpus, RowId};

use crate::{Error, Result};

/// The parts of a retrieval request that decide which persisted premises are visible.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessScope<'a> {
	pub imported_modules: Option<&'a [String]>,
	pub local_premises: Option<&'a [LocalPremiseRef]>,
	pub new_premises: &'a [NewPremise],
}

/// Resolves the persisted rows a request may see, sorted ascending.
///
/// Without `local_premises` the whole corpus is visible. Persisted premises sharing a name with an
/// ad-hoc premise are hidden so the ad-hoc version is the only one scored.
pub fn resolve_accessible(
	corpus: &Corpus,
	scope: AccessScope<'_>,
	max_new_premises: usize,
) -> Result<Vec<RowId>> {
	if scope.new_premises.len() > max_new_premises {
		return Err(Error::TooManyCandidates {
			count: scope.new_premises.len(),
			max: max_new_premises,
		});
	}

	let mut names: HashSet<&str> = HashSet::new();

	if let Some(modules) = scope.imported_modules {
		for module in modules {
			names.extend(corpus.module_names(module));
		}
	}

	match scope.local_premises {
		Some(local) =>
			for entry in local {
				let name = match entry {
					LocalPremiseRef::ByName(name) => Some(name.as_str()),
					LocalPremiseRef::ByRowRef(position) => corpus.unfiltered_name(*position),
				};

				if let Some(name) = name
					&& corpus.contains(name)
				{
					names.insert(name);
				}
			},
		None => names.extend(corpus.names()),
	}

	for premise in scope.new_premises {
		names.remove(premise.name.as_str());
	}

	let mut rows: Vec<RowId> = names.into_iter().filter_map(|name| corpus.row_of(name)).collect();

	rows.sort_unstable();
	rows.dedup();

	Ok(rows)
}

#[cfg(test)]
mod tests {
	use premise_domain::Premise;

	use super::*;

	fn corpus() -> Corpus {
		Corpus::new(
			vec![
				Premise::new("A", "M1", "a"),
				Premise::new("B", "M1", "b"),
				Premise::new("C", "M2", "c"),
				Premise::new("D", "M3", "d"),
			],
			vec![
				"A".to_string(),
				"B".to_string(),
				"private".to_string(),
				"C".to_string(),
				"D".to_string(),
			],
		)
	}

	fn new_premise(name: &str) -> NewPremise {
		NewPremise { name: name.to_string(), decl: format!("decl {name}") }
	}

	#[test]
	fn absent_local_premises_expose_whole_corpus() {
		let corpus = corpus();
		let rows = resolve_accessible(&corpus, AccessScope::default(), 4).expect("resolve failed");

		assert_eq!(rows, vec![0, 1, 2, 3]);
	}

	#[test]
	fn modules_and_local_refs_combine() {
		let corpus = corpus();
		let modules = vec!["M2".to_string(), "missing".to_string()];
		let local = vec![
			LocalPremiseRef::ByName("A".to_string()),
			LocalPremiseRef::ByRowRef(4),
			LocalPremiseRef::ByRowRef(2),
			LocalPremiseRef::ByRowRef(-1),
			LocalPremiseRef::ByRowRef(99),
			LocalPremiseRef::ByName("unknown".to_string()),
		];
		let scope = AccessScope {
			imported_modules: Some(&modules),
			local_premises: Some(&local),
			new_premises: &[],
		};

		assert_eq!(resolve_accessible(&corpus, scope, 4).expect("resolve failed"), vec![0, 2, 3]);
	}

	#[test]
	fn empty_local_premises_expose_nothing() {
		let corpus = corpus();
		let scope = AccessScope { local_premises: Some(&[]), ..Default::default() };

		assert!(resolve_accessible(&corpus, scope, 4).expect("resolve failed").is_empty());
	}

	#[test]
	fn ad_hoc_names_hide_persisted_premises_idempotently() {
		let corpus = corpus();
		let new = vec![new_premise("A"), new_premise("A"), new_premise("Z")];
		let scope = AccessScope { new_premises: &new, ..Default::default() };

		assert_eq!(resolve_accessible(&corpus, scope, 4).expect("resolve failed"), vec![1, 2, 3]);
	}

	#[test]
	fn ad_hoc_limit_is_enforced() {
		let corpus = corpus();
		let new = vec![new_premise("X"), new_premise("Y")];
		let scope = AccessScope { new_premises: &new, ..Default::default() };

		assert!(matches!(
			resolve_accessible(&corpus, scope, 1),
			Err(Error::TooManyCandidates { count: 2, max: 1 })
		));
	}
}
