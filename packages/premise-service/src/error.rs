pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid argument: {message}")]
	InvalidArgument { message: String },
	#[error("Too many new premises: {count} exceeds the limit of {max}.")]
	TooManyCandidates { count: usize, max: usize },
	#[error("Embedding service overloaded: requested {requested} inputs, {available} available.")]
	Overloaded { requested: usize, available: usize },
	#[error("Embedding backend error: {message}")]
	Backend { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<premise_providers::Error> for Error {
	fn from(err: premise_providers::Error) -> Self {
		Self::Backend { message: err.to_string() }
	}
}

impl From<premise_storage::Error> for Error {
	fn from(err: premise_storage::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<premise_domain::Error> for Error {
	fn from(err: premise_domain::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}
