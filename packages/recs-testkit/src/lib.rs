//! Disposable Postgres databases and Qdrant collections for integration tests.

mod error;

pub use error::{Error, Result};

use std::{env, str::FromStr};

use qdrant_client::Qdrant;
use sqlx::{
	ConnectOptions, Connection, Executor,
	postgres::{PgConnectOptions, PgConnection},
};
use uuid::Uuid;

pub const PG_DSN_VAR: &str = "RECS_PG_DSN";
pub const QDRANT_URL_VAR: &str = "RECS_QDRANT_URL";

/// A throwaway database created next to the one named by a base DSN.
///
/// Collections handed out through [`TestDatabase::collection_prefix`] are removed by
/// [`TestDatabase::cleanup`] together with the database.
pub struct TestDatabase {
	name: String,
	dsn: String,
	admin_options: PgConnectOptions,
	collections: Vec<String>,
}
impl TestDatabase {
	pub async fn new(base_dsn: &str) -> Result<Self> {
		let base_options = PgConnectOptions::from_str(base_dsn)
			.map_err(|err| Error::Message(format!("Failed to parse {PG_DSN_VAR}: {err}.")))?;
		let admin_options = base_options.clone().database("postgres");
		let name = format!("recs_test_{}", Uuid::new_v4().simple());
		let mut conn = PgConnection::connect_with(&admin_options).await?;

		conn.execute(format!(r#"CREATE DATABASE "{name}""#).as_str()).await?;

		let dsn = base_options.database(&name).to_url_lossy().to_string();

		Ok(Self { name, dsn, admin_options, collections: Vec::new() })
	}

	pub fn dsn(&self) -> &str {
		&self.dsn
	}

	/// Returns a prefix unique to this database and records `{prefix}_{namespace}` for cleanup.
	pub fn collection_prefix(&mut self, prefix: &str, namespaces: &[&str]) -> String {
		let unique = format!("{prefix}_{}", self.name);

		self.collections.extend(namespaces.iter().map(|namespace| format!("{unique}_{namespace}")));

		unique
	}

	pub async fn cleanup(self) -> Result<()> {
		if !self.collections.is_empty()
			&& let Some(url) = env_qdrant_url()
		{
			let client = Qdrant::from_url(&url).build()?;

			for collection in &self.collections {
				if client.collection_exists(collection.as_str()).await? {
					client.delete_collection(collection.as_str()).await?;
				}
			}
		}

		let mut conn = PgConnection::connect_with(&self.admin_options).await?;

		conn.execute(format!(r#"DROP DATABASE IF EXISTS "{}" WITH (FORCE)"#, self.name).as_str())
			.await?;

		Ok(())
	}
}

pub fn env_dsn() -> Option<String> {
	env::var(PG_DSN_VAR).ok().filter(|value| !value.trim().is_empty())
}

pub fn env_qdrant_url() -> Option<String> {
	env::var(QDRANT_URL_VAR).ok().filter(|value| !value.trim().is_empty())
}
