use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One hit from a top-K similarity query. Higher scores are more similar.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SimilarityMatch {
	pub id: String,
	pub score: f32,
}
impl SimilarityMatch {
	pub fn new(id: impl Into<String>, score: f32) -> Self {
		Self { id: id.into(), score }
	}
}

/// Records that can be matched against vector index identifiers.
pub trait Keyed {
	fn key(&self) -> &str;
}

/// Reorders `records` to follow `matches`.
///
/// Matches without a record are skipped, so the output is always a subsequence of the match
/// order. A repeated match id yields its record once.
pub fn join_by_similarity<R>(matches: &[SimilarityMatch], records: Vec<R>) -> Vec<R>
where
	R: Keyed,
{
	let mut by_key: HashMap<String, R> =
		records.into_iter().map(|record| (record.key().to_string(), record)).collect();
	let mut out = Vec::with_capacity(matches.len().min(by_key.len()));

	for hit in matches {
		if let Some(record) = by_key.remove(hit.id.as_str()) {
			out.push(record);
		}
	}

	out
}
