use std::sync::Arc;

use recs_config::{Config, VectorBackend};
use recs_service::RecsService;
use recs_storage::{VectorIndex, db::Db, memory::MemoryIndex, qdrant::QdrantStore};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<RecsService>,
}
impl AppState {
	/// Connects the catalog and the configured vector backend, bootstrapping both.
	pub async fn new(config: Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let index: Arc<dyn VectorIndex> = match config.storage.vector.backend {
			VectorBackend::Qdrant => {
				let store = QdrantStore::new(&config.storage.qdrant)?;

				store.ensure_collections().await?;

				Arc::new(store)
			},
			VectorBackend::Memory => {
				tracing::warn!("Using the in-memory vector index; vectors are lost on restart.");

				Arc::new(MemoryIndex::new(config.storage.qdrant.vector_dim))
			},
		};
		let service = RecsService::new(config, index, Arc::new(db));

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: RecsService) -> Self {
		Self { service: Arc::new(service) }
	}
}
