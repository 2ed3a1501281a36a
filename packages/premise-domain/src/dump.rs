//! Declaration dump parsing.
//!
//! A dump is JSON lines, one `{"name", "module", "decl"}` record per line. Every record is listed
//! in the unfiltered view; records whose names match an exclusion pattern are left out of the
//! indexed set.

use std::io::BufRead;

use regex::RegexSet;

use crate::{Error, Premise, Result};

#[derive(Debug, Default)]
pub struct Declarations {
	/// Premises to index, in dump order.
	pub premises: Vec<Premise>,
	/// Names of every record in the dump, in dump order.
	pub unfiltered_names: Vec<String>,
}

#[derive(Debug)]
pub struct NameFilter {
	excluded: RegexSet,
}
impl NameFilter {
	pub fn new<I, S>(patterns: I) -> Result<Self>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		Ok(Self { excluded: RegexSet::new(patterns)? })
	}

	pub fn allow_all() -> Self {
		Self { excluded: RegexSet::empty() }
	}

	pub fn is_indexed(&self, name: &str) -> bool {
		!self.excluded.is_match(name)
	}
}

pub fn parse<R>(reader: R, filter: &NameFilter) -> Result<Declarations>
where
	R: BufRead,
{
	let mut out = Declarations::default();

	for (idx, line) in reader.lines().enumerate() {
		let line = line?;
		let line_no = idx + 1;

		if line.trim().is_empty() {
			continue;
		}

		let premise: Premise = serde_json::from_str(&line)
			.map_err(|source| Error::MalformedRecord { line: line_no, source })?;

		if premise.name.trim().is_empty() {
			return Err(Error::EmptyField { line: line_no, field: "name" });
		}
		if premise.decl.trim().is_empty() {
			return Err(Error::EmptyField { line: line_no, field: "decl" });
		}

		out.unfiltered_names.push(premise.name.clone());

		if filter.is_indexed(&premise.name) {
			out.premises.push(premise);
		}
	}

	Ok(out)
}
