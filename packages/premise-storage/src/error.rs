pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Dimension mismatch: expected {expected}, got {actual}.")]
	DimensionMismatch { expected: usize, actual: usize },
	#[error("Corpus has {premises} premises but {vectors} vectors were supplied.")]
	RowCountMismatch { premises: usize, vectors: usize },
	#[error("Malformed embedding matrix: {message}")]
	MalformedMatrix { message: String },
	#[error(transparent)]
	Io(#[from] std::io::Error),
}
