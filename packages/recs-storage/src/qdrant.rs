use std::collections::HashMap;

use qdrant_client::{
	Payload, Qdrant, QdrantError,
	qdrant::{
		CreateCollectionBuilder, DeletePointsBuilder, Distance, GetPointsBuilder, PointId,
		PointStruct, Query, QueryPointsBuilder, UpsertPointsBuilder, Value, VectorParamsBuilder,
		VectorsOutput, value::Kind, vectors_output::VectorsOptions,
	},
};
use serde_json::{Map, Number, Value as JsonValue};
use uuid::Uuid;

use recs_domain::{Namespace, SimilarityMatch};

use crate::{BoxFuture, Error, Result, VectorIndex, VectorRecord};

/// Payload key holding the caller's identifier. Point ids are derived from it.
pub const EXTERNAL_ID_KEY: &str = "external_id";

const POINT_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6b1f_3c0e_93a4_4d2b_8f57_2c1e_9d04_a7b3);

pub struct QdrantStore {
	pub client: Qdrant,
	pub collection_prefix: String,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &recs_config::Qdrant) -> Result<Self> {
		let mut builder = Qdrant::from_url(&cfg.url);

		if let Some(api_key) = cfg.api_key.clone() {
			builder = builder.api_key(api_key);
		}

		let client = builder.build()?;

		Ok(Self {
			client,
			collection_prefix: cfg.collection_prefix.clone(),
			vector_dim: cfg.vector_dim,
		})
	}

	pub fn collection_name(&self, namespace: Namespace) -> String {
		collection_name(&self.collection_prefix, namespace)
	}

	/// Creates the per-namespace collections that do not exist yet.
	pub async fn ensure_collections(&self) -> Result<()> {
		for namespace in Namespace::ALL {
			let collection = self.collection_name(namespace);

			if self.client.collection_exists(collection.as_str()).await? {
				continue;
			}

			self.client
				.create_collection(CreateCollectionBuilder::new(collection.as_str()).vectors_config(
					VectorParamsBuilder::new(u64::from(self.vector_dim), Distance::Cosine),
				))
				.await?;

			tracing::info!(%collection, vector_dim = self.vector_dim, "Created Qdrant collection.");
		}

		Ok(())
	}

	async fn upsert_point(
		&self,
		namespace: Namespace,
		id: &str,
		vector: &[f32],
		metadata: Map<String, JsonValue>,
	) -> Result<()> {
		if vector.len() != self.vector_dim as usize {
			return Err(Error::InvalidArgument(format!(
				"Vector dimension {} does not match collection dimension {}.",
				vector.len(),
				self.vector_dim
			)));
		}

		let mut payload_map = HashMap::with_capacity(metadata.len() + 1);

		for (key, value) in metadata {
			payload_map.insert(key, Value::from(value));
		}

		payload_map.insert(EXTERNAL_ID_KEY.to_string(), Value::from(id.to_string()));

		let point = PointStruct::new(point_id(id), vector.to_vec(), Payload::from(payload_map));
		let upsert =
			UpsertPointsBuilder::new(self.collection_name(namespace), vec![point]).wait(true);

		self.client.upsert_points(upsert).await?;

		Ok(())
	}

	async fn query_points(
		&self,
		namespace: Namespace,
		vector: &[f32],
		top_k: u32,
	) -> Result<Vec<SimilarityMatch>> {
		let search = QueryPointsBuilder::new(self.collection_name(namespace))
			.query(Query::new_nearest(vector.to_vec()))
			.limit(u64::from(top_k))
			.with_payload(true);
		let response = self.client.query(search).await?;
		let mut matches = Vec::with_capacity(response.result.len());

		for point in response.result {
			let id = payload_string(&point.payload, EXTERNAL_ID_KEY).ok_or_else(|| {
				Error::Malformed(format!("Point in {namespace} is missing {EXTERNAL_ID_KEY}."))
			})?;

			matches.push(SimilarityMatch { id, score: point.score });
		}

		Ok(matches)
	}

	async fn fetch_point(&self, namespace: Namespace, id: &str) -> Result<Option<VectorRecord>> {
		let request =
			GetPointsBuilder::new(self.collection_name(namespace), vec![PointId::from(point_id(id))])
				.with_vectors(true)
				.with_payload(true);
		let response = self.client.get_points(request).await?;
		let Some(point) = response.result.into_iter().next() else {
			return Ok(None);
		};
		let vector = dense_vector(point.vectors).ok_or_else(|| {
			Error::Malformed(format!("Point {id:?} in {namespace} has no dense vector."))
		})?;
		let metadata = point
			.payload
			.into_iter()
			.filter(|(key, _)| key != EXTERNAL_ID_KEY)
			.map(|(key, value)| (key, json_from_payload(value)))
			.collect();

		Ok(Some(VectorRecord { vector, metadata }))
	}

	async fn delete_point(&self, namespace: Namespace, id: &str) -> Result<()> {
		let delete = DeletePointsBuilder::new(self.collection_name(namespace))
			.points(vec![PointId::from(point_id(id))])
			.wait(true);

		match self.client.delete_points(delete).await {
			Ok(_) => {},
			Err(err) =>
				if is_not_found_error(&err) {
					tracing::info!(%namespace, id, "Qdrant point missing during delete.");
				} else {
					return Err(err.into());
				},
		}

		Ok(())
	}
}
impl VectorIndex for QdrantStore {
	fn upsert<'a>(
		&'a self,
		namespace: Namespace,
		id: &'a str,
		vector: &'a [f32],
		metadata: Map<String, JsonValue>,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(self.upsert_point(namespace, id, vector, metadata))
	}

	fn query<'a>(
		&'a self,
		namespace: Namespace,
		vector: &'a [f32],
		top_k: u32,
	) -> BoxFuture<'a, Result<Vec<SimilarityMatch>>> {
		Box::pin(self.query_points(namespace, vector, top_k))
	}

	fn fetch<'a>(
		&'a self,
		namespace: Namespace,
		id: &'a str,
	) -> BoxFuture<'a, Result<Option<VectorRecord>>> {
		Box::pin(self.fetch_point(namespace, id))
	}

	fn delete<'a>(&'a self, namespace: Namespace, id: &'a str) -> BoxFuture<'a, Result<()>> {
		Box::pin(self.delete_point(namespace, id))
	}
}

pub fn collection_name(prefix: &str, namespace: Namespace) -> String {
	format!("{prefix}_{namespace}")
}

/// Qdrant only accepts integer or UUID point ids, so string identifiers are hashed into UUIDv5.
pub fn point_id(id: &str) -> String {
	Uuid::new_v5(&POINT_ID_NAMESPACE, id.as_bytes()).to_string()
}

fn is_not_found_error(err: &QdrantError) -> bool {
	let message = err.to_string().to_lowercase();

	(message.contains("not found") || message.contains("404"))
		&& (message.contains("point") || message.contains("collection"))
}

#[allow(deprecated)]
fn dense_vector(vectors: Option<VectorsOutput>) -> Option<Vec<f32>> {
	match vectors?.vectors_options? {
		VectorsOptions::Vector(output) => Some(output.data),
		VectorsOptions::Vectors(named) => named.vectors.into_values().next().map(|v| v.data),
	}
}

fn payload_string(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
	match &payload.get(key)?.kind {
		Some(Kind::StringValue(text)) => Some(text.clone()),
		_ => None,
	}
}

fn json_from_payload(value: Value) -> JsonValue {
	match value.kind {
		None | Some(Kind::NullValue(_)) => JsonValue::Null,
		Some(Kind::BoolValue(flag)) => JsonValue::Bool(flag),
		Some(Kind::IntegerValue(number)) => JsonValue::Number(number.into()),
		Some(Kind::DoubleValue(number)) =>
			Number::from_f64(number).map(JsonValue::Number).unwrap_or(JsonValue::Null),
		Some(Kind::StringValue(text)) => JsonValue::String(text),
		Some(Kind::ListValue(list)) =>
			JsonValue::Array(list.values.into_iter().map(json_from_payload).collect()),
		Some(Kind::StructValue(object)) => JsonValue::Object(
			object.fields.into_iter().map(|(key, value)| (key, json_from_payload(value))).collect(),
		),
	}
}
