mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, EmbeddingProviderConfig, Postgres, Providers, Qdrant, Recommend, Service, Storage,
	Trending, VectorBackend, VectorStorage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::Read { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::Parse { path: path.to_path_buf(), source: Box::new(err) })?;

	normalize(&mut cfg);
	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::validation("service.http_bind must be non-empty."));
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::validation("storage.postgres.pool_max_conns must be greater than zero."));
	}
	if cfg.storage.qdrant.collection_prefix.trim().is_empty() {
		return Err(Error::validation("storage.qdrant.collection_prefix must be non-empty."));
	}

	let embedding = &cfg.providers.embedding;

	if embedding.dimensions == 0 {
		return Err(Error::validation(
			"providers.embedding.dimensions must be greater than zero.",
		));
	}
	if embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::validation(
			"providers.embedding.dimensions must match storage.qdrant.vector_dim.",
		));
	}
	if embedding.max_input_chars == 0 {
		return Err(Error::validation(
			"providers.embedding.max_input_chars must be greater than zero.",
		));
	}
	if embedding.timeout_ms == 0 {
		return Err(Error::validation("providers.embedding.timeout_ms must be greater than zero."));
	}
	if embedding.api_key.trim().is_empty() {
		return Err(Error::validation("Provider embedding api_key must be non-empty."));
	}

	for (key, value) in &embedding.default_headers {
		if !value.is_string() {
			return Err(Error::validation(format!(
				"providers.embedding.default_headers.{key} must be a string."
			)));
		}
	}

	let recommend = &cfg.recommend;

	for (label, value) in [
		("recommend.text_top_k", recommend.text_top_k),
		("recommend.profile_top_k", recommend.profile_top_k),
		("recommend.default_page_size", recommend.default_page_size),
		("recommend.max_page_size", recommend.max_page_size),
		("recommend.max_query_chars", recommend.max_query_chars),
		("trending.window_days", cfg.trending.window_days),
		("trending.limit", cfg.trending.limit),
		("trending.popular_tags_limit", cfg.trending.popular_tags_limit),
	] {
		if value == 0 {
			return Err(Error::validation(format!("{label} must be greater than zero.")));
		}
	}

	if recommend.default_page_size > recommend.max_page_size {
		return Err(Error::validation(
			"recommend.default_page_size must not exceed recommend.max_page_size.",
		));
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let embedding = &mut cfg.providers.embedding;

	while embedding.api_base.ends_with('/') {
		embedding.api_base.pop();
	}

	if cfg.storage.qdrant.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
		cfg.storage.qdrant.api_key = None;
	}
}
