use serde_json::Map;
use time::{Duration, OffsetDateTime};

use recs_config::{Postgres, Qdrant};
use recs_domain::{EngagementCounts, Namespace};
use recs_storage::{Catalog, VectorIndex, db::Db, qdrant::QdrantStore};
use recs_testkit::TestDatabase;

async fn seed(db: &Db, now: OffsetDateTime) {
	let old = now - Duration::days(30);
	let statements = [
		"INSERT INTO users (user_id, username) VALUES ('u1', 'ada'), ('u2', 'brian'), ('u3', 'cleo')",
		"INSERT INTO tags (tag_id, name, count) VALUES ('t1', 'rust', 5), ('t2', 'go', 2), ('t3', 'sql', 9)",
		"INSERT INTO articles (article_id, author_id, title) VALUES ('a', 'u1', 'A'), ('b', 'u2', 'B')",
		"INSERT INTO articles (article_id, author_id, title, deleted_at) VALUES ('gone', 'u1', 'Gone', now())",
		"INSERT INTO article_tags (article_id, tag_id) VALUES ('a', 't1'), ('a', 't3'), ('b', 't2')",
		"INSERT INTO likes (like_id, article_id, user_id) VALUES ('l1', 'a', 'u1'), ('l2', 'a', 'u2'), ('l3', 'b', 'u3'), ('l4', 'gone', 'u1')",
		"INSERT INTO comments (comment_id, article_id, user_id, content) VALUES ('c1', 'b', 'u1', 'nice')",
	];

	for statement in statements {
		sqlx::query(statement).execute(&db.pool).await.expect("Failed to seed catalog.");
	}

	sqlx::query(
		"INSERT INTO bookmarks (bookmark_id, article_id, user_id, created_at) VALUES ('k1', 'b', 'u2', $1)",
	)
	.bind(old)
	.execute(&db.pool)
	.await
	.expect("Failed to seed old bookmark.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set RECS_PG_DSN to run."]
async fn catalog_reads_live_articles_and_batched_counts() {
	let Some(base_dsn) = recs_testkit::env_dsn() else {
		eprintln!("Skipping catalog_reads_live_articles_and_batched_counts; set RECS_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 2 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");
	let now = OffsetDateTime::now_utc();

	db.ensure_schema().await.expect("Failed to ensure schema.");
	db.ensure_schema().await.expect("Schema bootstrap must be repeatable.");
	seed(&db, now).await;

	let ids = vec!["a".to_string(), "gone".to_string(), "b".to_string(), "zzz".to_string()];
	let mut articles = db.find_articles_by_ids(&ids).await.expect("Failed to find articles.");

	articles.sort_by(|left, right| left.article_id.cmp(&right.article_id));

	assert_eq!(articles.len(), 2);
	assert_eq!(articles[0].article_id, "a");
	assert_eq!(articles[0].tags.len(), 2);
	assert_eq!(articles[0].author.as_ref().map(|author| author.username.as_str()), Some("ada"));
	assert_eq!(articles[1].comments.len(), 1);

	let counts = db.engagement_counts(&ids).await.expect("Failed to count engagement.");

	assert_eq!(counts.get("a"), Some(&EngagementCounts::new(2, 0, 0)));
	assert_eq!(counts.get("b"), Some(&EngagementCounts::new(1, 1, 1)));
	assert!(!counts.contains_key("zzz"));

	let windowed = db
		.windowed_engagement(now - Duration::days(10), 10)
		.await
		.expect("Failed to load windowed engagement.");
	let ids = windowed.iter().map(|item| item.article.article_id.as_str()).collect::<Vec<_>>();

	assert_eq!(ids, vec!["a", "b"]);
	assert_eq!(windowed[0].counts, EngagementCounts::new(2, 0, 0));
	assert_eq!(windowed[1].counts, EngagementCounts::new(1, 1, 0));

	let top = db
		.windowed_engagement(now - Duration::days(10), 1)
		.await
		.expect("Failed to load limited windowed engagement.");

	assert_eq!(top.len(), 1);
	assert_eq!(top[0].article.article_id, "a");

	let tags = db
		.find_tags_by_names(&["rust".to_string(), "unknown".to_string()])
		.await
		.expect("Failed to find tags.");

	assert_eq!(tags.len(), 1);

	let tag_ids = vec!["t1".to_string(), "t2".to_string()];

	db.link_user_tags("u3", &tag_ids).await.expect("Failed to link tags.");
	db.link_user_tags("u3", &tag_ids).await.expect("Linking twice must not fail.");

	let linked: i64 = sqlx::query_scalar("SELECT count(*) FROM user_tags WHERE user_id = 'u3'")
		.fetch_one(&db.pool)
		.await
		.expect("Failed to count user tags.");

	assert_eq!(linked, 2);

	let popular = db.popular_tags(2).await.expect("Failed to load popular tags.");
	let names = popular.iter().map(|tag| tag.name.as_str()).collect::<Vec<_>>();

	assert_eq!(names, vec!["sql", "rust"]);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres and Qdrant. Set RECS_PG_DSN and RECS_QDRANT_URL to run."]
async fn qdrant_store_round_trips_namespaced_points() {
	let (Some(base_dsn), Some(qdrant_url)) =
		(recs_testkit::env_dsn(), recs_testkit::env_qdrant_url())
	else {
		eprintln!(
			"Skipping qdrant_store_round_trips_namespaced_points; set RECS_PG_DSN and RECS_QDRANT_URL to run this test."
		);

		return;
	};
	let mut test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let namespaces = Namespace::ALL.map(Namespace::as_str);
	let prefix = test_db.collection_prefix("recs", &namespaces);
	let cfg = Qdrant { url: qdrant_url, collection_prefix: prefix, vector_dim: 3, api_key: None };
	let store = QdrantStore::new(&cfg).expect("Failed to build Qdrant client.");

	store.ensure_collections().await.expect("Failed to ensure collections.");
	store
		.upsert(Namespace::Articles, "article-1", &[1.0, 0.0, 0.0], Map::new())
		.await
		.expect("Failed to upsert article.");
	store
		.upsert(Namespace::Tags, "article-1", &[0.0, 1.0, 0.0], Map::new())
		.await
		.expect("Failed to upsert tag.");

	let matches = store
		.query(Namespace::Articles, &[1.0, 0.1, 0.0], 5)
		.await
		.expect("Failed to query articles.");

	assert_eq!(matches.first().map(|m| m.id.as_str()), Some("article-1"));

	let record = store
		.fetch(Namespace::Tags, "article-1")
		.await
		.expect("Failed to fetch tag.")
		.expect("Expected tag vector.");

	assert_eq!(record.vector, vec![0.0, 1.0, 0.0]);

	store.delete(Namespace::Articles, "article-1").await.expect("Failed to delete.");
	store.delete(Namespace::Articles, "article-1").await.expect("Delete must be idempotent.");

	assert!(store.fetch(Namespace::Articles, "article-1").await.expect("fetch").is_none());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
