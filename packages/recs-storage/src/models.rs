use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use recs_domain::{EngagementCounts, Keyed};

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct AuthorSummary {
	pub user_id: String,
	pub username: String,
	pub picture: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, sqlx::FromRow)]
pub struct TagRef {
	pub tag_id: String,
	pub name: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CommentSummary {
	pub comment_id: String,
	pub content: String,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	pub user_id: String,
	pub username: Option<String>,
	pub picture: Option<String>,
}

/// A live article with the associations shown alongside recommendations.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ArticleRecord {
	pub article_id: String,
	pub title: String,
	pub content: String,
	pub image: Option<String>,
	pub url: Option<String>,
	pub author: Option<AuthorSummary>,
	pub tags: Vec<TagRef>,
	pub comments: Vec<CommentSummary>,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
}
impl Keyed for ArticleRecord {
	fn key(&self) -> &str {
		&self.article_id
	}
}

/// Flat article projection used for trending lists.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ArticleSummary {
	pub article_id: String,
	pub title: String,
	pub image: Option<String>,
	pub url: Option<String>,
	pub author: Option<AuthorSummary>,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ArticleEngagement {
	pub article: ArticleSummary,
	pub counts: EngagementCounts,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, sqlx::FromRow)]
pub struct TagRecord {
	pub tag_id: String,
	pub name: String,
	pub count: i64,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ArticleRow {
	pub(crate) article_id: String,
	pub(crate) title: String,
	pub(crate) content: String,
	pub(crate) image: Option<String>,
	pub(crate) url: Option<String>,
	pub(crate) created_at: OffsetDateTime,
	pub(crate) author_id: Option<String>,
	pub(crate) author_username: Option<String>,
	pub(crate) author_picture: Option<String>,
}
impl ArticleRow {
	pub(crate) fn author(&self) -> Option<AuthorSummary> {
		let user_id = self.author_id.clone()?;

		Some(AuthorSummary {
			user_id,
			username: self.author_username.clone().unwrap_or_default(),
			picture: self.author_picture.clone(),
		})
	}
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ArticleTagRow {
	pub(crate) article_id: String,
	pub(crate) tag_id: String,
	pub(crate) name: String,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CommentRow {
	pub(crate) article_id: String,
	pub(crate) comment_id: String,
	pub(crate) content: String,
	pub(crate) created_at: OffsetDateTime,
	pub(crate) user_id: String,
	pub(crate) username: Option<String>,
	pub(crate) picture: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CountRow {
	pub(crate) article_id: String,
	pub(crate) total: i64,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct EngagementRow {
	pub(crate) article_id: String,
	pub(crate) title: String,
	pub(crate) image: Option<String>,
	pub(crate) url: Option<String>,
	pub(crate) created_at: OffsetDateTime,
	pub(crate) author_id: Option<String>,
	pub(crate) author_username: Option<String>,
	pub(crate) author_picture: Option<String>,
	pub(crate) likes: i64,
	pub(crate) comments: i64,
	pub(crate) bookmarks: i64,
}
