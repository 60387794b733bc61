use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use recs_domain::{Namespace, text, vector};
use recs_storage::models::TagRecord;

use crate::{Error, RecsService, Result};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TagPreferencesRequest {
	pub user_id: String,
	pub names: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TagPreferencesResponse {
	pub user_id: String,
	pub tags: Vec<TagRecord>,
	pub profile_updated: bool,
}

impl RecsService {
	/// Replaces the user's preference vector with the mean of the selected tags' vectors.
	///
	/// Names that match no known tag are ignored. Tags without a stored vector are embedded and
	/// written back before averaging.
	pub async fn set_tag_preferences(
		&self,
		req: TagPreferencesRequest,
	) -> Result<TagPreferencesResponse> {
		let user_id = req.user_id.trim();

		if user_id.is_empty() {
			return Err(Error::invalid_input("user_id must be non-empty."));
		}
		if req.names.is_empty() {
			return Err(Error::invalid_input("names must contain at least one tag."));
		}

		let names = normalized_names(&req.names)?;
		let tags = self.catalog.find_tags_by_names(&names).await?;

		if tags.is_empty() {
			tracing::info!(user_id, requested = names.len(), "No submitted tag names matched.");

			return Ok(TagPreferencesResponse {
				user_id: user_id.to_string(),
				tags,
				profile_updated: false,
			});
		}

		let mut vectors = Vec::with_capacity(tags.len());

		for tag in &tags {
			vectors.push(self.tag_vector(tag).await?);
		}

		let mean = vector::mean_embedding(&vectors)?;
		let profile_updated = !mean.is_empty();

		if profile_updated {
			let mut metadata = Map::new();

			metadata.insert("user_id".to_string(), Value::from(user_id));
			metadata.insert(
				"tags".to_string(),
				Value::from(tags.iter().map(|tag| tag.name.clone()).collect::<Vec<_>>()),
			);

			self.index.upsert(Namespace::Users, user_id, &mean, metadata).await?;
		}

		let tag_ids = tags.iter().map(|tag| tag.tag_id.clone()).collect::<Vec<_>>();

		self.catalog.link_user_tags(user_id, &tag_ids).await?;

		tracing::info!(user_id, tags = tag_ids.len(), profile_updated, "Tag preferences saved.");

		Ok(TagPreferencesResponse { user_id: user_id.to_string(), tags, profile_updated })
	}

	async fn tag_vector(&self, tag: &TagRecord) -> Result<Vec<f32>> {
		if let Some(record) = self.index.fetch(Namespace::Tags, &tag.tag_id).await? {
			return Ok(record.vector);
		}

		tracing::info!(tag_id = %tag.tag_id, "Backfilling missing tag vector.");

		let vector = self.embed_text(&tag.name).await?;

		self.index.upsert(Namespace::Tags, &tag.tag_id, &vector, tag_metadata(&tag.name)).await?;

		Ok(vector)
	}
}

pub(crate) fn tag_metadata(name: &str) -> Map<String, Value> {
	let mut metadata = Map::new();

	metadata.insert("name".to_string(), Value::from(name));

	metadata
}

/// Trimmed, lowercased, first-seen-order unique names. A blank name is rejected.
pub(crate) fn normalized_names(raw: &[String]) -> Result<Vec<String>> {
	let mut seen = HashSet::new();
	let mut out = Vec::with_capacity(raw.len());

	for name in raw {
		let Some(name) = text::normalize_tag_name(name) else {
			return Err(Error::invalid_input("tag names must be non-empty."));
		};

		if seen.insert(name.clone()) {
			out.push(name);
		}
	}

	Ok(out)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn names_are_normalized_and_deduplicated_in_order() {
		let raw = vec![" Rust".to_string(), "go".to_string(), "RUST ".to_string()];

		assert_eq!(normalized_names(&raw).expect("valid names"), vec!["rust", "go"]);
	}

	#[test]
	fn blank_names_are_rejected() {
		let raw = vec!["rust".to_string(), "  ".to_string()];

		assert!(matches!(normalized_names(&raw), Err(Error::InvalidInput { .. })));
	}
}
