use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use recs_domain::{TrendingWindow, rank_trending};
use recs_storage::models::{ArticleEngagement, TagRecord};

use crate::{Error, RecsService, Result};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct TrendingRequest {
	pub window_days: Option<u32>,
	pub limit: Option<u32>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TrendingResponse {
	pub items: Vec<ArticleEngagement>,
	#[serde(with = "time::serde::rfc3339")]
	pub since: OffsetDateTime,
	#[serde(with = "time::serde::rfc3339")]
	pub until: OffsetDateTime,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PopularTagsResponse {
	pub items: Vec<TagRecord>,
}

impl RecsService {
	pub async fn trending(&self, req: TrendingRequest) -> Result<TrendingResponse> {
		self.trending_at(req, OffsetDateTime::now_utc()).await
	}

	/// Ranks live articles by likes, then comments, then bookmarks inside the window ending at
	/// `now`.
	pub async fn trending_at(
		&self,
		req: TrendingRequest,
		now: OffsetDateTime,
	) -> Result<TrendingResponse> {
		let window_days = req.window_days.unwrap_or(self.cfg.trending.window_days);
		let limit = req.limit.unwrap_or(self.cfg.trending.limit);

		if window_days == 0 {
			return Err(Error::invalid_input("window_days must be greater than zero."));
		}
		if limit == 0 {
			return Err(Error::invalid_input("limit must be greater than zero."));
		}

		let window = TrendingWindow::trailing(now, window_days)?;
		let candidates = self.catalog.windowed_engagement(window.since, limit).await?;
		let items = rank_trending(candidates, |item| item.counts, limit as usize);

		tracing::debug!(window_days, returned = items.len(), "Trending articles ranked.");

		Ok(TrendingResponse { items, since: window.since, until: window.until })
	}

	pub async fn popular_tags(&self) -> Result<PopularTagsResponse> {
		let items = self.catalog.popular_tags(self.cfg.trending.popular_tags_limit).await?;

		Ok(PopularTagsResponse { items })
	}
}
