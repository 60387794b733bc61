use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use recs_domain::{
	EngagementCounts, Namespace, Page, PageRequest, SimilarityMatch, join_by_similarity, paginate,
};
use recs_storage::models::ArticleRecord;

use crate::{Error, RecsService, Result};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TextRecommendRequest {
	pub content: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TextRecommendResponse {
	pub items: Vec<ArticleRecord>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct UserRecommendRequest {
	pub user_id: String,
	pub page: Option<u32>,
	pub limit: Option<u32>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct RecommendedArticle {
	pub article: ArticleRecord,
	pub counts: EngagementCounts,
}

impl RecsService {
	/// Articles most similar to free text, in similarity order.
	pub async fn recommend_by_text(
		&self,
		req: TextRecommendRequest,
	) -> Result<TextRecommendResponse> {
		let content = req.content.trim();

		if content.is_empty() {
			return Err(Error::invalid_input("content must be non-empty."));
		}

		let max_chars = self.cfg.recommend.max_query_chars as usize;

		if content.chars().count() > max_chars {
			return Err(Error::invalid_input(format!(
				"content must be at most {max_chars} characters."
			)));
		}

		let vector = self.embed_text(content).await?;
		let matches =
			self.index.query(Namespace::Articles, &vector, self.cfg.recommend.text_top_k).await?;
		let items = self.join_articles(&matches).await?;

		Ok(TextRecommendResponse { items })
	}

	/// A page of articles near the user's stored preference vector, with engagement counts.
	pub async fn recommend_for_user(
		&self,
		req: UserRecommendRequest,
	) -> Result<Page<RecommendedArticle>> {
		let user_id = req.user_id.trim();

		if user_id.is_empty() {
			return Err(Error::invalid_input("user_id must be non-empty."));
		}

		let request = self.page_request(req.page, req.limit)?;
		let profile = self.index.fetch(Namespace::Users, user_id).await?.ok_or_else(|| {
			Error::NotFound { message: format!("No preference profile for user {user_id}.") }
		})?;
		let matches = self
			.index
			.query(Namespace::Articles, &profile.vector, self.cfg.recommend.profile_top_k)
			.await?;
		let ordered = self.join_articles(&matches).await?;

		self.with_counts(paginate(ordered, request)).await
	}

	pub(crate) async fn join_articles(
		&self,
		matches: &[SimilarityMatch],
	) -> Result<Vec<ArticleRecord>> {
		if matches.is_empty() {
			return Ok(Vec::new());
		}

		let ids = matches.iter().map(|hit| hit.id.clone()).collect::<Vec<_>>();
		let records = self.catalog.find_articles_by_ids(&ids).await?;
		let joined = join_by_similarity(matches, records);

		if joined.len() < matches.len() {
			tracing::debug!(
				matches = matches.len(),
				joined = joined.len(),
				"Dropped vector matches without a live article."
			);
		}

		Ok(joined)
	}

	fn page_request(&self, page: Option<u32>, limit: Option<u32>) -> Result<PageRequest> {
		let cfg = &self.cfg.recommend;
		let page_size = limit.unwrap_or(cfg.default_page_size);

		if page_size > cfg.max_page_size {
			return Err(Error::invalid_input(format!(
				"limit must be at most {}.",
				cfg.max_page_size
			)));
		}

		Ok(PageRequest::new(page.unwrap_or(1), page_size)?)
	}

	async fn with_counts(&self, page: Page<ArticleRecord>) -> Result<Page<RecommendedArticle>> {
		let counts = if page.items.is_empty() {
			HashMap::new()
		} else {
			let ids = page.items.iter().map(|item| item.article_id.clone()).collect::<Vec<_>>();

			self.catalog.engagement_counts(&ids).await?
		};

		Ok(page.map(|article| {
			let counts = counts.get(&article.article_id).copied().unwrap_or_default();

			RecommendedArticle { article, counts }
		}))
	}
}
