use std::collections::HashMap;

use time::OffsetDateTime;

use recs_domain::EngagementCounts;

use crate::{
	BoxFuture, Result,
	models::{ArticleEngagement, ArticleRecord, TagRecord},
};

/// Relational side of the pipeline. Each method returns a fixed, typed shape.
pub trait Catalog
where
	Self: Send + Sync,
{
	/// Live articles among `ids`, in no particular order. Soft-deleted articles are omitted.
	fn find_articles_by_ids<'a>(
		&'a self,
		ids: &'a [String],
	) -> BoxFuture<'a, Result<Vec<ArticleRecord>>>;

	/// Likes, comments, and bookmarks for `ids`, one aggregation per count type.
	///
	/// Articles without any engagement may be absent from the map.
	fn engagement_counts<'a>(
		&'a self,
		ids: &'a [String],
	) -> BoxFuture<'a, Result<HashMap<String, EngagementCounts>>>;

	/// The `limit` most engaged live articles, counting only events created at or after `since`.
	///
	/// Ordered by likes, comments, and bookmarks descending, then newest first.
	fn windowed_engagement(
		&self,
		since: OffsetDateTime,
		limit: u32,
	) -> BoxFuture<'_, Result<Vec<ArticleEngagement>>>;

	fn find_tags_by_names<'a>(
		&'a self,
		names: &'a [String],
	) -> BoxFuture<'a, Result<Vec<TagRecord>>>;

	/// Records preference links. Existing links are left untouched.
	fn link_user_tags<'a>(
		&'a self,
		user_id: &'a str,
		tag_ids: &'a [String],
	) -> BoxFuture<'a, Result<()>>;

	fn popular_tags(&self, limit: u32) -> BoxFuture<'_, Result<Vec<TagRecord>>>;
}
