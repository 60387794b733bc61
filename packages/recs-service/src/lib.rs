pub mod indexing;
pub mod preferences;
pub mod recommend;
pub mod trending;

mod error;

pub use error::{Error, Result};
pub use indexing::{IndexArticleRequest, IndexArticleResponse, IndexTagRequest, IndexTagResponse};
pub use preferences::{TagPreferencesRequest, TagPreferencesResponse};
pub use recommend::{
	RecommendedArticle, TextRecommendRequest, TextRecommendResponse, UserRecommendRequest,
};
pub use trending::{PopularTagsResponse, TrendingRequest, TrendingResponse};

use std::{future::Future, pin::Pin, sync::Arc};

use recs_config::{Config, EmbeddingProviderConfig};
use recs_domain::text;
use recs_providers::embedding;
use recs_storage::{Catalog, VectorIndex};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, recs_providers::Result<Vec<Vec<f32>>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
}
impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>) -> Self {
		Self { embedding }
	}
}
impl Default for Providers {
	fn default() -> Self {
		Self { embedding: Arc::new(DefaultProviders) }
	}
}

struct DefaultProviders;
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, recs_providers::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}

/// Stateless recommendation service. Vectors live in `index`, entities in `catalog`.
pub struct RecsService {
	pub cfg: Config,
	pub index: Arc<dyn VectorIndex>,
	pub catalog: Arc<dyn Catalog>,
	pub providers: Providers,
}
impl RecsService {
	pub fn new(cfg: Config, index: Arc<dyn VectorIndex>, catalog: Arc<dyn Catalog>) -> Self {
		Self { cfg, index, catalog, providers: Providers::default() }
	}

	pub fn with_providers(
		cfg: Config,
		index: Arc<dyn VectorIndex>,
		catalog: Arc<dyn Catalog>,
		providers: Providers,
	) -> Self {
		Self { cfg, index, catalog, providers }
	}

	/// Embeds one text, cutting it to the configured ceiling first.
	///
	/// Any provider failure, including an empty or wrongly sized result, is `ServiceUnavailable`.
	pub(crate) async fn embed_text(&self, input: &str) -> Result<Vec<f32>> {
		let cfg = &self.cfg.providers.embedding;
		let ceiling = cfg.max_input_chars as usize;
		let (text, truncated) = text::truncate_chars(input, ceiling);

		if truncated {
			tracing::warn!(
				original_chars = input.chars().count(),
				ceiling,
				"Embedding input exceeds the ceiling and was truncated."
			);
		}

		let texts = [text.to_string()];
		let vectors = self.providers.embedding.embed(cfg, &texts).await?;
		let Some(vector) = vectors.into_iter().next() else {
			return Err(Error::unavailable("Embedding provider returned no vectors."));
		};

		if vector.len() != cfg.dimensions as usize {
			return Err(Error::unavailable(format!(
				"Embedding provider returned {} dimensions, expected {}.",
				vector.len(),
				cfg.dimensions
			)));
		}

		Ok(vector)
	}
}
