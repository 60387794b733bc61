pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Service unavailable: {message}")]
	ServiceUnavailable { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Invalid input: {message}")]
	InvalidInput { message: String },
	#[error("Internal error: {message}")]
	Internal { message: String },
}
impl Error {
	pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
		Self::InvalidInput { message: message.into() }
	}

	pub(crate) fn unavailable(message: impl Into<String>) -> Self {
		Self::ServiceUnavailable { message: message.into() }
	}
}

impl From<recs_storage::Error> for Error {
	fn from(err: recs_storage::Error) -> Self {
		match err {
			recs_storage::Error::Qdrant(inner) =>
				Self::ServiceUnavailable { message: format!("Vector index failed: {inner}") },
			recs_storage::Error::Sqlx(inner) => Self::Internal { message: inner.to_string() },
			recs_storage::Error::InvalidArgument(message) => Self::InvalidInput { message },
			recs_storage::Error::Malformed(message) => Self::Internal { message },
		}
	}
}

impl From<recs_domain::Error> for Error {
	fn from(err: recs_domain::Error) -> Self {
		Self::InvalidInput { message: err.to_string() }
	}
}

impl From<recs_providers::Error> for Error {
	fn from(err: recs_providers::Error) -> Self {
		Self::ServiceUnavailable { message: format!("Embedding provider failed: {err}") }
	}
}
