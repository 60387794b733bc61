use std::collections::HashMap;

use sqlx::{PgPool, postgres::PgPoolOptions};
use time::OffsetDateTime;

use recs_domain::EngagementCounts;

use crate::{
	BoxFuture, Catalog, Result,
	models::{
		ArticleEngagement, ArticleRecord, ArticleRow, ArticleSummary, ArticleTagRow, AuthorSummary,
		CommentRow, CommentSummary, CountRow, EngagementRow, TagRecord, TagRef,
	},
	schema,
};

const SCHEMA_LOCK_ID: i64 = 7_320_415;

pub struct Db {
	pub pool: PgPool,
}
impl Db {
	pub async fn connect(cfg: &recs_config::Postgres) -> Result<Self> {
		let pool =
			PgPoolOptions::new().max_connections(cfg.pool_max_conns).connect(&cfg.dsn).await?;

		Ok(Self { pool })
	}

	pub async fn ensure_schema(&self) -> Result<()> {
		let sql = schema::render_schema();
		// The advisory lock is transaction scoped so concurrent bootstraps serialize on one
		// connection and release on commit.
		let mut tx = self.pool.begin().await?;

		sqlx::query("SELECT pg_advisory_xact_lock($1)")
			.bind(SCHEMA_LOCK_ID)
			.execute(&mut *tx)
			.await?;

		for statement in sql.split(';') {
			let trimmed = statement.trim();

			if trimmed.is_empty() {
				continue;
			}

			sqlx::query(trimmed).execute(&mut *tx).await?;
		}

		tx.commit().await?;

		Ok(())
	}

	async fn articles_by_ids(&self, ids: &[String]) -> Result<Vec<ArticleRecord>> {
		if ids.is_empty() {
			return Ok(Vec::new());
		}

		let rows: Vec<ArticleRow> = sqlx::query_as(
			"\
SELECT
	a.article_id,
	a.title,
	a.content,
	a.image,
	a.url,
	a.created_at,
	u.user_id AS author_id,
	u.username AS author_username,
	u.picture AS author_picture
FROM articles a
LEFT JOIN users u ON u.user_id = a.author_id
WHERE a.article_id = ANY($1)
	AND a.deleted_at IS NULL",
		)
		.bind(ids)
		.fetch_all(&self.pool)
		.await?;

		if rows.is_empty() {
			return Ok(Vec::new());
		}

		let live_ids = rows.iter().map(|row| row.article_id.clone()).collect::<Vec<_>>();
		let (tag_rows, comment_rows) =
			tokio::try_join!(self.article_tags(&live_ids), self.article_comments(&live_ids))?;
		let mut tags: HashMap<String, Vec<TagRef>> = HashMap::new();
		let mut comments: HashMap<String, Vec<CommentSummary>> = HashMap::new();

		for row in tag_rows {
			tags.entry(row.article_id).or_default().push(TagRef { tag_id: row.tag_id, name: row.name });
		}
		for row in comment_rows {
			comments.entry(row.article_id).or_default().push(CommentSummary {
				comment_id: row.comment_id,
				content: row.content,
				created_at: row.created_at,
				user_id: row.user_id,
				username: row.username,
				picture: row.picture,
			});
		}

		let records = rows
			.into_iter()
			.map(|row| {
				let author = row.author();

				ArticleRecord {
					tags: tags.remove(&row.article_id).unwrap_or_default(),
					comments: comments.remove(&row.article_id).unwrap_or_default(),
					article_id: row.article_id,
					title: row.title,
					content: row.content,
					image: row.image,
					url: row.url,
					author,
					created_at: row.created_at,
				}
			})
			.collect();

		Ok(records)
	}

	async fn article_tags(&self, ids: &[String]) -> Result<Vec<ArticleTagRow>> {
		let rows = sqlx::query_as(
			"\
SELECT at.article_id, t.tag_id, t.name
FROM article_tags at
JOIN tags t ON t.tag_id = at.tag_id
WHERE at.article_id = ANY($1)
ORDER BY t.name ASC",
		)
		.bind(ids)
		.fetch_all(&self.pool)
		.await?;

		Ok(rows)
	}

	async fn article_comments(&self, ids: &[String]) -> Result<Vec<CommentRow>> {
		let rows = sqlx::query_as(
			"\
SELECT
	c.article_id,
	c.comment_id,
	c.content,
	c.created_at,
	c.user_id,
	u.username,
	u.picture
FROM comments c
LEFT JOIN users u ON u.user_id = c.user_id
WHERE c.article_id = ANY($1)
ORDER BY c.created_at ASC, c.comment_id ASC",
		)
		.bind(ids)
		.fetch_all(&self.pool)
		.await?;

		Ok(rows)
	}

	async fn counts(&self, table: CountTable, ids: &[String]) -> Result<Vec<CountRow>> {
		let sql = format!(
			"\
SELECT article_id, count(*) AS total
FROM {}
WHERE article_id = ANY($1)
GROUP BY article_id",
			table.as_str()
		);
		let rows = sqlx::query_as(&sql).bind(ids).fetch_all(&self.pool).await?;

		Ok(rows)
	}

	async fn engagement_by_ids(&self, ids: &[String]) -> Result<HashMap<String, EngagementCounts>> {
		if ids.is_empty() {
			return Ok(HashMap::new());
		}

		let (likes, comments, bookmarks) = tokio::try_join!(
			self.counts(CountTable::Likes, ids),
			self.counts(CountTable::Comments, ids),
			self.counts(CountTable::Bookmarks, ids),
		)?;
		let mut out: HashMap<String, EngagementCounts> = HashMap::new();

		for row in likes {
			out.entry(row.article_id).or_default().likes = to_count(row.total);
		}
		for row in comments {
			out.entry(row.article_id).or_default().comments = to_count(row.total);
		}
		for row in bookmarks {
			out.entry(row.article_id).or_default().bookmarks = to_count(row.total);
		}

		Ok(out)
	}

	async fn engagement_since(
		&self,
		since: OffsetDateTime,
		limit: u32,
	) -> Result<Vec<ArticleEngagement>> {
		let rows: Vec<EngagementRow> = sqlx::query_as(
			"\
SELECT
	a.article_id,
	a.title,
	a.image,
	a.url,
	a.created_at,
	u.user_id AS author_id,
	u.username AS author_username,
	u.picture AS author_picture,
	(SELECT count(*) FROM likes l WHERE l.article_id = a.article_id AND l.created_at >= $1) AS likes,
	(SELECT count(*) FROM comments c WHERE c.article_id = a.article_id AND c.created_at >= $1) AS comments,
	(SELECT count(*) FROM bookmarks b WHERE b.article_id = a.article_id AND b.created_at >= $1) AS bookmarks
FROM articles a
LEFT JOIN users u ON u.user_id = a.author_id
WHERE a.deleted_at IS NULL
ORDER BY likes DESC, comments DESC, bookmarks DESC, a.created_at DESC, a.article_id ASC
LIMIT $2",
		)
		.bind(since)
		.bind(i64::from(limit))
		.fetch_all(&self.pool)
		.await?;

		Ok(rows.into_iter().map(engagement_from_row).collect())
	}

	async fn tags_by_names(&self, names: &[String]) -> Result<Vec<TagRecord>> {
		if names.is_empty() {
			return Ok(Vec::new());
		}

		let rows = sqlx::query_as(
			"SELECT tag_id, name, count FROM tags WHERE name = ANY($1) ORDER BY name ASC",
		)
		.bind(names)
		.fetch_all(&self.pool)
		.await?;

		Ok(rows)
	}

	async fn insert_user_tags(&self, user_id: &str, tag_ids: &[String]) -> Result<()> {
		if tag_ids.is_empty() {
			return Ok(());
		}

		sqlx::query(
			"\
INSERT INTO user_tags (user_id, tag_id)
SELECT $1, tag_id
FROM unnest($2::text[]) AS t(tag_id)
ON CONFLICT (user_id, tag_id) DO NOTHING",
		)
		.bind(user_id)
		.bind(tag_ids)
		.execute(&self.pool)
		.await?;

		Ok(())
	}

	async fn most_used_tags(&self, limit: u32) -> Result<Vec<TagRecord>> {
		let rows = sqlx::query_as(
			"SELECT tag_id, name, count FROM tags ORDER BY count DESC, name ASC LIMIT $1",
		)
		.bind(i64::from(limit))
		.fetch_all(&self.pool)
		.await?;

		Ok(rows)
	}
}
impl Catalog for Db {
	fn find_articles_by_ids<'a>(
		&'a self,
		ids: &'a [String],
	) -> BoxFuture<'a, Result<Vec<ArticleRecord>>> {
		Box::pin(self.articles_by_ids(ids))
	}

	fn engagement_counts<'a>(
		&'a self,
		ids: &'a [String],
	) -> BoxFuture<'a, Result<HashMap<String, EngagementCounts>>> {
		Box::pin(self.engagement_by_ids(ids))
	}

	fn windowed_engagement(
		&self,
		since: OffsetDateTime,
		limit: u32,
	) -> BoxFuture<'_, Result<Vec<ArticleEngagement>>> {
		Box::pin(self.engagement_since(since, limit))
	}

	fn find_tags_by_names<'a>(
		&'a self,
		names: &'a [String],
	) -> BoxFuture<'a, Result<Vec<TagRecord>>> {
		Box::pin(self.tags_by_names(names))
	}

	fn link_user_tags<'a>(
		&'a self,
		user_id: &'a str,
		tag_ids: &'a [String],
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(self.insert_user_tags(user_id, tag_ids))
	}

	fn popular_tags(&self, limit: u32) -> BoxFuture<'_, Result<Vec<TagRecord>>> {
		Box::pin(self.most_used_tags(limit))
	}
}

#[derive(Clone, Copy, Debug)]
enum CountTable {
	Likes,
	Comments,
	Bookmarks,
}
impl CountTable {
	fn as_str(self) -> &'static str {
		match self {
			Self::Likes => "likes",
			Self::Comments => "comments",
			Self::Bookmarks => "bookmarks",
		}
	}
}

fn to_count(total: i64) -> u64 {
	u64::try_from(total).unwrap_or_default()
}

fn engagement_from_row(row: EngagementRow) -> ArticleEngagement {
	let author = row.author_id.map(|user_id| AuthorSummary {
		user_id,
		username: row.author_username.unwrap_or_default(),
		picture: row.author_picture,
	});

	ArticleEngagement {
		article: ArticleSummary {
			article_id: row.article_id,
			title: row.title,
			image: row.image,
			url: row.url,
			author,
			created_at: row.created_at,
		},
		counts: EngagementCounts::new(
			to_count(row.likes),
			to_count(row.comments),
			to_count(row.bookmarks),
		),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn negative_totals_clamp_to_zero() {
		assert_eq!(to_count(-3), 0);
		assert_eq!(to_count(42), 42);
	}

	#[test]
	fn count_tables_name_their_sources() {
		assert_eq!(CountTable::Likes.as_str(), "likes");
		assert_eq!(CountTable::Comments.as_str(), "comments");
		assert_eq!(CountTable::Bookmarks.as_str(), "bookmarks");
	}
}
