//! Ingestion Pipeline (C10): chunk, embed, and write to both vector stores
//! with compensating rollback on partial failure.

pub mod chunker;
pub mod error;

pub use chunker::chunk_text;
pub use error::IngestionError;

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::embedding::EmbeddingClient;
use crate::vectordb::{PrimaryStore, SecondaryStore};

const SECONDARY_RETRY_BASE: Duration = Duration::from_millis(100);
const SECONDARY_RETRY_CAP: Duration = Duration::from_secs(5);
const SECONDARY_MAX_RETRIES: u32 = 3;

/// Result of a successful [`Ingestor::ingest`] call.
#[derive(Debug, Clone, Copy)]
pub struct IngestOutcome {
    pub document_id: Uuid,
    pub chunks_inserted: usize,
}

pub struct Ingestor {
    primary: Arc<PrimaryStore>,
    secondary: Option<Arc<SecondaryStore>>,
    embedding_client: Arc<EmbeddingClient>,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Ingestor {
    pub fn new(
        primary: Arc<PrimaryStore>,
        secondary: Option<Arc<SecondaryStore>>,
        embedding_client: Arc<EmbeddingClient>,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Self {
        Self {
            primary,
            secondary,
            embedding_client,
            chunk_size,
            chunk_overlap,
        }
    }

    /// Runs the two-phase write protocol in §4.10. On any failure, the
    /// document and every chunk written so far (on both stores) are rolled
    /// back before the error is returned.
    pub async fn ingest(
        &self,
        content: &str,
        title: Option<&str>,
        source: Option<&str>,
    ) -> Result<IngestOutcome, IngestionError> {
        let chunks = chunk_text(content, self.chunk_size, self.chunk_overlap);

        let document_id = self
            .primary
            .insert_document(title, source)
            .await
            .map_err(IngestionError::Primary)?;

        let mut inserted_chunk_ids: Vec<Uuid> = Vec::with_capacity(chunks.len());

        for (index, chunk_content) in chunks.iter().enumerate() {
            let chunk_index = index as i32;
            let embedding = self.embedding_client.embed_one(chunk_content).await?;

            let chunk_id = match self
                .primary
                .insert_chunk(document_id, chunk_index, chunk_content, &embedding)
                .await
            {
                Ok(id) => id,
                Err(e) => {
                    self.rollback(document_id, &inserted_chunk_ids).await;
                    return Err(IngestionError::Primary(e));
                }
            };
            inserted_chunk_ids.push(chunk_id);

            if let Some(secondary) = &self.secondary {
                if let Err(secondary_error) = self
                    .insert_secondary_with_retry(
                        secondary,
                        chunk_id,
                        document_id,
                        chunk_index,
                        chunk_content,
                        source,
                        &embedding,
                    )
                    .await
                {
                    warn!(
                        document_id = %document_id,
                        chunk_index,
                        "secondary insert exhausted retries; rolling back"
                    );
                    if let Err(e) = self.primary.delete_chunk(chunk_id).await {
                        error!(chunk_id = %chunk_id, error = %e, "failed to delete just-inserted primary chunk during rollback");
                    }
                    self.rollback(document_id, &inserted_chunk_ids[..inserted_chunk_ids.len() - 1])
                        .await;
                    return Err(IngestionError::SecondaryWriteFailed {
                        document_id,
                        chunk_index,
                        source: secondary_error,
                    });
                }
            }
        }

        info!(document_id = %document_id, chunks_inserted = chunks.len(), "ingestion complete");

        Ok(IngestOutcome {
            document_id,
            chunks_inserted: chunks.len(),
        })
    }

    #[allow(clippy::too_many_arguments)]
    async fn insert_secondary_with_retry(
        &self,
        secondary: &SecondaryStore,
        chunk_id: Uuid,
        document_id: Uuid,
        chunk_index: i32,
        content: &str,
        source: Option<&str>,
        embedding: &[f32],
    ) -> Result<(), crate::vectordb::VectorDbError> {
        let mut delay = SECONDARY_RETRY_BASE;
        let mut attempt = 0;
        loop {
            match secondary
                .upsert_point(chunk_id, document_id, chunk_index, content, source, embedding)
                .await
            {
                Ok(()) => return Ok(()),
                Err(e) => {
                    attempt += 1;
                    if attempt > SECONDARY_MAX_RETRIES {
                        return Err(e);
                    }
                    warn!(attempt, chunk_id = %chunk_id, error = %e, "secondary insert failed, retrying");
                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(SECONDARY_RETRY_CAP);
                }
            }
        }
    }

    /// Deletes `document_id` (cascading its chunks in the primary store) and
    /// every already-inserted secondary point by chunk id (§4.10 step 3).
    async fn rollback(&self, document_id: Uuid, inserted_chunk_ids: &[Uuid]) {
        if let Err(e) = self.primary.delete_document(document_id).await {
            error!(document_id = %document_id, error = %e, "failed to delete document during rollback");
        }
        if let Some(secondary) = &self.secondary {
            for chunk_id in inserted_chunk_ids {
                if let Err(e) = secondary.delete_point(*chunk_id).await {
                    error!(chunk_id = %chunk_id, error = %e, "failed to delete secondary point during rollback");
                }
            }
        }
    }
}
