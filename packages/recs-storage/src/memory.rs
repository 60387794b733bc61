use std::{
	cmp::Ordering,
	collections::HashMap,
	sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use serde_json::{Map, Value};

use recs_domain::{Namespace, SimilarityMatch, vector};

use crate::{BoxFuture, Error, Result, VectorIndex, VectorRecord};

type Spaces = HashMap<Namespace, HashMap<String, VectorRecord>>;

/// Exact in-process index using cosine similarity. Intended for development and tests.
pub struct MemoryIndex {
	vector_dim: usize,
	spaces: RwLock<Spaces>,
}
impl MemoryIndex {
	pub fn new(vector_dim: u32) -> Self {
		Self { vector_dim: vector_dim as usize, spaces: RwLock::new(HashMap::new()) }
	}

	pub fn len(&self, namespace: Namespace) -> usize {
		self.read().get(&namespace).map(HashMap::len).unwrap_or(0)
	}

	pub fn is_empty(&self, namespace: Namespace) -> bool {
		self.len(namespace) == 0
	}

	fn read(&self) -> RwLockReadGuard<'_, Spaces> {
		self.spaces.read().unwrap_or_else(|err| err.into_inner())
	}

	fn write(&self) -> RwLockWriteGuard<'_, Spaces> {
		self.spaces.write().unwrap_or_else(|err| err.into_inner())
	}

	fn check_dim(&self, vector: &[f32]) -> Result<()> {
		if vector.len() != self.vector_dim {
			return Err(Error::InvalidArgument(format!(
				"Vector dimension {} does not match index dimension {}.",
				vector.len(),
				self.vector_dim
			)));
		}

		Ok(())
	}
}
impl VectorIndex for MemoryIndex {
	fn upsert<'a>(
		&'a self,
		namespace: Namespace,
		id: &'a str,
		vector: &'a [f32],
		metadata: Map<String, Value>,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			self.check_dim(vector)?;
			self.write()
				.entry(namespace)
				.or_default()
				.insert(id.to_string(), VectorRecord { vector: vector.to_vec(), metadata });

			Ok(())
		})
	}

	fn query<'a>(
		&'a self,
		namespace: Namespace,
		vector: &'a [f32],
		top_k: u32,
	) -> BoxFuture<'a, Result<Vec<SimilarityMatch>>> {
		Box::pin(async move {
			self.check_dim(vector)?;

			let mut matches = match self.read().get(&namespace) {
				Some(space) => space
					.iter()
					.map(|(id, record)| SimilarityMatch {
						id: id.clone(),
						score: vector::cosine_similarity(vector, &record.vector).unwrap_or(0.0),
					})
					.collect::<Vec<_>>(),
				None => Vec::new(),
			};

			matches.sort_by(|left, right| {
				right
					.score
					.partial_cmp(&left.score)
					.unwrap_or(Ordering::Equal)
					.then_with(|| left.id.cmp(&right.id))
			});
			matches.truncate(top_k as usize);

			Ok(matches)
		})
	}

	fn fetch<'a>(
		&'a self,
		namespace: Namespace,
		id: &'a str,
	) -> BoxFuture<'a, Result<Option<VectorRecord>>> {
		Box::pin(async move {
			Ok(self.read().get(&namespace).and_then(|space| space.get(id)).cloned())
		})
	}

	fn delete<'a>(&'a self, namespace: Namespace, id: &'a str) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			if let Some(space) = self.write().get_mut(&namespace) {
				space.remove(id);
			}

			Ok(())
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn block_on<F: std::future::Future>(future: F) -> F::Output {
		tokio::runtime::Builder::new_current_thread()
			.build()
			.expect("Failed to build runtime.")
			.block_on(future)
	}

	#[test]
	fn namespaces_do_not_share_identifiers() {
		let index = MemoryIndex::new(2);

		block_on(async {
			index.upsert(Namespace::Tags, "42", &[1.0, 0.0], Map::new()).await.expect("upsert");
			index.upsert(Namespace::Users, "42", &[0.0, 1.0], Map::new()).await.expect("upsert");

			let tag = index.fetch(Namespace::Tags, "42").await.expect("fetch").expect("present");
			let user = index.fetch(Namespace::Users, "42").await.expect("fetch").expect("present");

			assert_eq!(tag.vector, vec![1.0, 0.0]);
			assert_eq!(user.vector, vec![0.0, 1.0]);
			assert!(index.fetch(Namespace::Articles, "42").await.expect("fetch").is_none());
		});
	}

	#[test]
	fn rejects_wrong_dimension() {
		let index = MemoryIndex::new(3);
		let err = block_on(index.upsert(Namespace::Articles, "a", &[1.0], Map::new()))
			.expect_err("expected dimension error");

		assert!(matches!(err, Error::InvalidArgument(_)));
	}
}
