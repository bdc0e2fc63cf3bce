//! Secondary vector-store adapter (Qdrant).
//!
//! Grounded on the teacher's `vectordb/client.rs` `QdrantClient` (connection
//! wrapper, `ensure_collection`, `upsert_points`, `search`, `delete_points`
//! shapes), retargeted to the spec's mirrored-collection dual-store role: the
//! reported score is already a `[0, 1]` similarity, no distance conversion.

use std::collections::HashMap;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, Distance, Filter, PointStruct, SearchPointsBuilder,
    UpsertPointsBuilder, VectorParamsBuilder, point_id::PointIdOptions,
};
use uuid::Uuid;

use super::error::VectorDbError;
use super::model::VectorSearchHit;

/// Default Qdrant collection name mirroring the primary store's chunks.
pub const DEFAULT_COLLECTION_NAME: &str = "lantern_chunks";

/// Adapter over the secondary (Qdrant) mirrored collection.
#[derive(Clone)]
pub struct SecondaryStore {
    client: Qdrant,
    collection: String,
    dimension: usize,
}

impl SecondaryStore {
    /// Connects to `url` and targets `collection`.
    pub async fn connect(
        url: &str,
        collection: impl Into<String>,
        dimension: usize,
    ) -> Result<Self, VectorDbError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| VectorDbError::SecondaryStore {
                message: format!("failed to connect to secondary store at '{url}': {e}"),
            })?;
        Ok(Self {
            client,
            collection: collection.into(),
            dimension,
        })
    }

    /// Creates the mirrored collection if it doesn't already exist.
    pub async fn ensure_collection(&self) -> Result<(), VectorDbError> {
        let exists = self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| VectorDbError::SecondaryStore {
                message: e.to_string(),
            })?;

        if !exists {
            self.client
                .create_collection(
                    CreateCollectionBuilder::new(&self.collection)
                        .vectors_config(VectorParamsBuilder::new(
                            self.dimension as u64,
                            Distance::Cosine,
                        )),
                )
                .await
                .map_err(|e| VectorDbError::SecondaryStore {
                    message: format!("failed to create collection '{}': {e}", self.collection),
                })?;
        }
        Ok(())
    }

    /// Upserts one point, keyed by `chunk_id`, with the payload the spec
    /// names in §4.10: `{chunk_id, document_id, chunk_index, content,
    /// source}`. A single attempt — the caller (ingestion) owns the
    /// exponential-backoff retry loop around this call per §4.10 step 2b.
    pub async fn upsert_point(
        &self,
        chunk_id: Uuid,
        document_id: Uuid,
        chunk_index: i32,
        content: &str,
        source: Option<&str>,
        embedding: &[f32],
    ) -> Result<(), VectorDbError> {
        if embedding.len() != self.dimension {
            return Err(VectorDbError::InvalidDimension {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }

        let mut payload: HashMap<String, qdrant_client::qdrant::Value> = HashMap::new();
        payload.insert("chunk_id".to_string(), chunk_id.to_string().into());
        payload.insert("document_id".to_string(), document_id.to_string().into());
        payload.insert("chunk_index".to_string(), (chunk_index as i64).into());
        payload.insert("content".to_string(), content.into());
        if let Some(source) = source {
            payload.insert("source".to_string(), source.into());
        }

        let point = PointStruct::new(chunk_id.to_string(), embedding.to_vec(), payload);

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, vec![point]).wait(true))
            .await
            .map_err(|e| VectorDbError::SecondaryStore {
                message: format!("upsert failed for chunk {chunk_id}: {e}"),
            })?;

        Ok(())
    }

    /// Deletes a point by chunk id. Idempotent: deleting a missing point
    /// succeeds as a no-op (Qdrant's delete is unconditional).
    pub async fn delete_point(&self, chunk_id: Uuid) -> Result<(), VectorDbError> {
        use qdrant_client::qdrant::{DeletePointsBuilder, PointsIdsList};

        let selector = PointsIdsList {
            ids: vec![chunk_id.to_string().into()],
        };

        self.client
            .delete_points(
                DeletePointsBuilder::new(&self.collection)
                    .points(selector)
                    .wait(true),
            )
            .await
            .map_err(|e| VectorDbError::SecondaryStore {
                message: format!("delete failed for chunk {chunk_id}: {e}"),
            })?;
        Ok(())
    }

    /// Deletes every point whose payload's `document_id` matches (used when
    /// a document delete must cascade to the secondary store too).
    pub async fn delete_points_for_document(&self, document_id: Uuid) -> Result<(), VectorDbError> {
        use qdrant_client::qdrant::DeletePointsBuilder;

        let filter = Filter::must([Condition::matches(
            "document_id",
            document_id.to_string(),
        )]);

        self.client
            .delete_points(DeletePointsBuilder::new(&self.collection).points(filter).wait(true))
            .await
            .map_err(|e| VectorDbError::SecondaryStore {
                message: format!("delete failed for document {document_id}: {e}"),
            })?;
        Ok(())
    }

    /// Cosine top-k search, already reporting a `[0, 1]` similarity.
    pub async fn search(
        &self,
        query_embedding: &[f32],
        k: usize,
    ) -> Result<Vec<VectorSearchHit>, VectorDbError> {
        let search_result = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, query_embedding.to_vec(), k as u64)
                    .with_payload(true),
            )
            .await
            .map_err(|e| VectorDbError::SecondaryStore {
                message: format!("search failed: {e}"),
            })?;

        Ok(search_result
            .result
            .into_iter()
            .filter_map(|point| {
                let chunk_id = match point.id.clone().and_then(|pid| pid.point_id_options) {
                    Some(PointIdOptions::Uuid(s)) => Uuid::parse_str(&s).ok()?,
                    Some(PointIdOptions::Num(n)) => Uuid::from_u128(n as u128),
                    None => return None,
                };
                let payload = point.payload;
                let document_id = payload
                    .get("document_id")
                    .and_then(|v| v.as_str())
                    .and_then(|s| Uuid::parse_str(s).ok())?;
                let chunk_index = payload
                    .get("chunk_index")
                    .and_then(|v| v.as_integer())
                    .unwrap_or(0) as i32;
                let content = payload
                    .get("content")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string();
                let source = payload.get("source").and_then(|v| v.as_str()).map(str::to_string);

                Some(VectorSearchHit {
                    chunk_id,
                    document_id,
                    chunk_index,
                    content,
                    source,
                    vector_sim: point.score,
                })
            })
            .collect())
    }

    /// Total point count, used by the reconciler to compute drift.
    pub async fn count_points(&self) -> Result<u64, VectorDbError> {
        let info = self
            .client
            .collection_info(&self.collection)
            .await
            .map_err(|e| VectorDbError::SecondaryStore {
                message: format!("collection_info failed: {e}"),
            })?;
        Ok(info.result.and_then(|r| r.points_count).unwrap_or(0))
    }
}
