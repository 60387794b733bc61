use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use recs_domain::{Namespace, text};

use crate::{Error, RecsService, Result, preferences};

pub const MIN_ARTICLE_TAGS: usize = 3;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct IndexArticleRequest {
	pub article_id: String,
	pub title: String,
	pub author_id: Option<String>,
	pub tags: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct IndexArticleResponse {
	pub article_id: String,
	pub namespace: Namespace,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct IndexTagRequest {
	pub tag_id: String,
	pub name: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct IndexTagResponse {
	pub tag_id: String,
	pub namespace: Namespace,
}

impl RecsService {
	/// Embeds the article's tag names and stores the vector under the article id.
	///
	/// Tags are normalised and deduplicated before the minimum count is checked.
	pub async fn index_article(&self, req: IndexArticleRequest) -> Result<IndexArticleResponse> {
		let article_id = req.article_id.trim();

		if article_id.is_empty() {
			return Err(Error::invalid_input("article_id must be non-empty."));
		}

		let tags = preferences::normalized_names(&req.tags)?;

		if tags.len() < MIN_ARTICLE_TAGS {
			return Err(Error::invalid_input(format!(
				"tags must contain at least {MIN_ARTICLE_TAGS} distinct tags."
			)));
		}

		let vector = self.embed_text(&tags.join(", ")).await?;
		let mut metadata = Map::new();

		metadata.insert("title".to_string(), Value::from(req.title.trim()));

		if let Some(author_id) = req.author_id.as_deref().map(str::trim).filter(|id| !id.is_empty())
		{
			metadata.insert("author_id".to_string(), Value::from(author_id));
		}

		self.index.upsert(Namespace::Articles, article_id, &vector, metadata).await?;

		tracing::info!(article_id, tags = tags.len(), "Article vector indexed.");

		Ok(IndexArticleResponse { article_id: article_id.to_string(), namespace: Namespace::Articles })
	}

	pub async fn index_tag(&self, req: IndexTagRequest) -> Result<IndexTagResponse> {
		let tag_id = req.tag_id.trim();

		if tag_id.is_empty() {
			return Err(Error::invalid_input("tag_id must be non-empty."));
		}

		let name = text::normalize_tag_name(&req.name)
			.ok_or_else(|| Error::invalid_input("name must be non-empty."))?;
		let vector = self.embed_text(&name).await?;

		self.index
			.upsert(Namespace::Tags, tag_id, &vector, preferences::tag_metadata(&name))
			.await?;

		Ok(IndexTagResponse { tag_id: tag_id.to_string(), namespace: Namespace::Tags })
	}

	/// Drops the article's vector. Removing an unknown id succeeds.
	pub async fn remove_article(&self, article_id: &str) -> Result<()> {
		let article_id = article_id.trim();

		if article_id.is_empty() {
			return Err(Error::invalid_input("article_id must be non-empty."));
		}

		self.index.delete(Namespace::Articles, article_id).await?;

		Ok(())
	}
}
