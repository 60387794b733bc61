use serde_json::{Map, Value};

use recs_domain::{Namespace, SimilarityMatch};

use crate::{BoxFuture, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct VectorRecord {
	pub vector: Vec<f32>,
	pub metadata: Map<String, Value>,
}

/// Namespaced similarity store.
///
/// Upsert and delete are idempotent. Fetching or deleting an unknown id is not an error.
pub trait VectorIndex
where
	Self: Send + Sync,
{
	fn upsert<'a>(
		&'a self,
		namespace: Namespace,
		id: &'a str,
		vector: &'a [f32],
		metadata: Map<String, Value>,
	) -> BoxFuture<'a, Result<()>>;

	/// At most `top_k` matches, best first. Tie order is unspecified.
	fn query<'a>(
		&'a self,
		namespace: Namespace,
		vector: &'a [f32],
		top_k: u32,
	) -> BoxFuture<'a, Result<Vec<SimilarityMatch>>>;

	fn fetch<'a>(
		&'a self,
		namespace: Namespace,
		id: &'a str,
	) -> BoxFuture<'a, Result<Option<VectorRecord>>>;

	fn delete<'a>(&'a self, namespace: Namespace, id: &'a str) -> BoxFuture<'a, Result<()>>;
}
