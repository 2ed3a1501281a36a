pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to read declaration dump: {0}")]
	Io(#[from] std::io::Error),
	#[error("Malformed declaration record at line {line}: {source}")]
	MalformedRecord { line: usize, source: serde_json::Error },
	#[error("Declaration record at line {line} has an empty {field}.")]
	EmptyField { line: usize, field: &'static str },
	#[error(transparent)]
	Pattern(#[from] regex::Error),
}
