use std::io::Cursor;

use premise_domain::{
	Error,
	dump::{self, NameFilter},
};

const DUMP: &str = r#"{"name": "Nat.add_comm", "module": "Mathlib.Algebra.Group", "decl": "theorem Nat.add_comm (n m : ℕ) : n + m = m + n"}

{"name": "Nat._private.helper", "module": "Mathlib.Algebra.Group", "decl": "def Nat._private.helper : ℕ"}
{"name": "List.map_id", "module": "Mathlib.Data.List", "decl": "theorem List.map_id (l : List α) : l.map id = l"}
"#;

#[test]
fn every_record_is_listed_but_excluded_names_are_not_indexed() {
	let filter = NameFilter::new([r"\._private\."]).expect("Failed to build filter.");
	let decls = dump::parse(Cursor::new(DUMP), &filter).expect("Failed to parse dump.");

	assert_eq!(decls.unfiltered_names, ["Nat.add_comm", "Nat._private.helper", "List.map_id"]);

	let indexed: Vec<_> = decls.premises.iter().map(|premise| premise.name.as_str()).collect();

	assert_eq!(indexed, ["Nat.add_comm", "List.map_id"]);
	assert_eq!(decls.premises[1].module, "Mathlib.Data.List");
}

#[test]
fn allow_all_indexes_everything() {
	let decls = dump::parse(Cursor::new(DUMP), &NameFilter::allow_all())
		.expect("Failed to parse dump.");

	assert_eq!(decls.premises.len(), decls.unfiltered_names.len());
}

#[test]
fn malformed_line_reports_its_line_number() {
	let payload = format!("{DUMP}{{\"name\": \"broken\"\n");
	let err = dump::parse(Cursor::new(payload), &NameFilter::allow_all())
		.expect_err("Expected malformed record error.");

	assert!(matches!(err, Error::MalformedRecord { line: 5, .. }), "Unexpected error: {err:?}");
}

#[test]
fn empty_decl_is_rejected() {
	let payload = r#"{"name": "Foo.bar", "module": "Foo", "decl": "  "}"#;
	let err = dump::parse(Cursor::new(payload), &NameFilter::allow_all())
		.expect_err("Expected empty field error.");

	assert!(matches!(err, Error::EmptyField { line: 1, field: "decl" }));
}
