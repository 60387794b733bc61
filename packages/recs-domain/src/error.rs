pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error("Vector dimension mismatch: expected {expected}, got {actual}.")]
	DimensionMismatch { expected: usize, actual: usize },
	#[error("Invalid page request: {message}")]
	InvalidPage { message: String },
	#[error("Invalid trending window: {message}")]
	InvalidWindow { message: String },
	#[error("Unknown namespace: {0}.")]
	UnknownNamespace(String),
}
