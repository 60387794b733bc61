use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub recommend: Recommend,
	#[serde(default)]
	pub trending: Trending,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	pub qdrant: Qdrant,
	#[serde(default)]
	pub vector: VectorStorage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Qdrant {
	pub url: String,
	/// Each namespace lives in its own collection named "<collection_prefix>_<namespace>".
	pub collection_prefix: String,
	pub vector_dim: u32,
	pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VectorStorage {
	#[serde(default)]
	pub backend: VectorBackend,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorBackend {
	#[default]
	Qdrant,
	/// Exact in-process index. Contents are lost on restart.
	Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	/// Longer inputs are cut to this many characters before dispatch.
	#[serde(default = "default_max_input_chars")]
	pub max_input_chars: u32,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Recommend {
	pub text_top_k: u32,
	pub profile_top_k: u32,
	pub default_page_size: u32,
	pub max_page_size: u32,
	pub max_query_chars: u32,
}
impl Default for Recommend {
	fn default() -> Self {
		Self {
			text_top_k: 3,
			profile_top_k: 50,
			default_page_size: 12,
			max_page_size: 100,
			max_query_chars: 8_192,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Trending {
	pub window_days: u32,
	pub limit: u32,
	pub popular_tags_limit: u32,
}
impl Default for Trending {
	fn default() -> Self {
		Self { window_days: 10, limit: 10, popular_tags_limit: 9 }
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_max_input_chars() -> u32 {
	7_500
}
