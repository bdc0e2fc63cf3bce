//! Primary vector-store adapter (Postgres + pgvector).
//!
//! Grounded on the teacher's `vectordb/client.rs` `QdrantClient` wrapper shape
//! (connect-once struct, one method per operation, errors mapped at the
//! boundary), retargeted from Qdrant-only to the spec's primary relational
//! store. `documents`/`chunks` DDL is out of scope (spec.md §1); these
//! queries assume the shape in `storage::{Document, Chunk}`.

use chrono::Utc;
use pgvector::Vector;
use sqlx::PgPool;
use uuid::Uuid;

use crate::storage::{Document, QueryRewriteRecord};

use super::error::VectorDbError;
use super::model::VectorSearchHit;

/// Adapter over the primary (Postgres + pgvector) store.
#[derive(Clone)]
pub struct PrimaryStore {
    pool: PgPool,
    dimension: usize,
}

impl PrimaryStore {
    /// Wraps an existing pool, agreeing on embedding dimension `dimension`.
    pub fn new(pool: PgPool, dimension: usize) -> Self {
        Self { pool, dimension }
    }

    /// Connects to `database_url`.
    pub async fn connect(database_url: &str, dimension: usize) -> Result<Self, VectorDbError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| VectorDbError::PrimaryStore {
                message: format!("failed to connect to primary store: {e}"),
            })?;
        Ok(Self::new(pool, dimension))
    }

    /// Underlying connection pool, for callers (ingestion, reconciler) that
    /// need to compose additional queries.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Inserts a document row, returning its generated id.
    pub async fn insert_document(
        &self,
        title: Option<&str>,
        source: Option<&str>,
    ) -> Result<Uuid, VectorDbError> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        sqlx::query("INSERT INTO documents (id, title, source, created_at) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind(title)
            .bind(source)
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    /// Inserts a chunk row. Rejects an embedding whose length disagrees with
    /// the configured dimension (§3 Chunk invariant).
    pub async fn insert_chunk(
        &self,
        document_id: Uuid,
        chunk_index: i32,
        content: &str,
        embedding: &[f32],
    ) -> Result<Uuid, VectorDbError> {
        if embedding.len() != self.dimension {
            return Err(VectorDbError::InvalidDimension {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }

        let id = Uuid::new_v4();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO chunks (id, document_id, chunk_index, content, embedding, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(id)
        .bind(document_id)
        .bind(chunk_index)
        .bind(content)
        .bind(Vector::from(embedding.to_vec()))
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    /// Deletes a single chunk by id. Idempotent: deleting a missing chunk
    /// succeeds as a no-op.
    pub async fn delete_chunk(&self, chunk_id: Uuid) -> Result<(), VectorDbError> {
        sqlx::query("DELETE FROM chunks WHERE id = $1")
            .bind(chunk_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Deletes a document and, via `ON DELETE CASCADE`, all of its chunks.
    /// Idempotent: deleting a missing document succeeds as a no-op.
    pub async fn delete_document(&self, document_id: Uuid) -> Result<(), VectorDbError> {
        sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(document_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Returns `document_id`'s row, if it exists.
    pub async fn get_document(&self, document_id: Uuid) -> Result<Option<Document>, VectorDbError> {
        let doc = sqlx::query_as::<_, Document>(
            "SELECT id, title, source, created_at FROM documents WHERE id = $1",
        )
        .bind(document_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(doc)
    }

    /// Cosine top-k search (§4.3): returns up to `k` hits ordered by
    /// ascending cosine distance, with `vector_sim = 1 - distance`.
    pub async fn vector_search(
        &self,
        query_embedding: &[f32],
        k: usize,
    ) -> Result<Vec<VectorSearchHit>, VectorDbError> {
        if query_embedding.len() != self.dimension {
            return Err(VectorDbError::InvalidDimension {
                expected: self.dimension,
                actual: query_embedding.len(),
            });
        }

        let query_vec = Vector::from(query_embedding.to_vec());
        let rows: Vec<(Uuid, Uuid, i32, String, Option<String>, f32)> = sqlx::query_as(
            "SELECT c.id, c.document_id, c.chunk_index, c.content, d.source, \
                    (c.embedding <=> $1) AS distance \
             FROM chunks c JOIN documents d ON d.id = c.document_id \
             ORDER BY c.embedding <=> $1 \
             LIMIT $2",
        )
        .bind(&query_vec)
        .bind(k as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(chunk_id, document_id, chunk_index, content, source, distance)| {
                VectorSearchHit {
                    chunk_id,
                    document_id,
                    chunk_index,
                    content,
                    source,
                    vector_sim: 1.0 - distance,
                }
            })
            .collect())
    }

    /// Persists a query-rewrite audit record (§6 "Persisted state"). Never
    /// read back by the coordinator; exists purely for audit and analytics.
    pub async fn insert_query_rewrite(
        &self,
        record: &QueryRewriteRecord,
    ) -> Result<(), VectorDbError> {
        sqlx::query(
            "INSERT INTO query_rewrites (id, original, rewritten, created_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(record.id)
        .bind(&record.original)
        .bind(&record.rewritten)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Total chunk count, used by the reconciler to compute drift.
    pub async fn count_chunks(&self) -> Result<i64, VectorDbError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chunks")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
