//! Keyword adapter (C4): trigram title search over the primary store.
//!
//! Grounded on the primary store's Postgres connection ([`PrimaryStore`]),
//! using `pg_trgm`'s `similarity()` function the way the vector adapter uses
//! pgvector's `<=>` operator — a single SQL query, mapped into typed rows.

use sqlx::PgPool;
use uuid::Uuid;

use crate::vectordb::VectorDbError;

/// A document whose title trigram-matched the search text.
#[derive(Debug, Clone)]
pub struct TitleMatch {
    /// Matched document id.
    pub document_id: Uuid,
    /// Matched document title.
    pub title: String,
    /// Document's source descriptor, if any.
    pub source: Option<String>,
    /// Trigram similarity in `[0, 1]`.
    pub trigram_sim: f32,
}

/// A chunk returned by the keyword side-channel's follow-on lookup.
#[derive(Debug, Clone)]
pub struct KeywordChunk {
    /// Chunk id.
    pub chunk_id: Uuid,
    /// Owning document id.
    pub document_id: Uuid,
    /// Chunk index within the document.
    pub chunk_index: i32,
    /// Chunk text content.
    pub content: String,
    /// Document source descriptor, if any.
    pub source: Option<String>,
}

/// Maximum chunks returned per matched document (§4.4 invariant: prevents a
/// single dominant document from monopolizing the keyword side-channel).
pub const MAX_CHUNKS_PER_DOCUMENT: i64 = 2;

/// Trigram keyword search over document titles.
#[derive(Clone)]
pub struct KeywordAdapter {
    pool: PgPool,
}

impl KeywordAdapter {
    /// Wraps a pool shared with the primary store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns up to `k` documents whose title trigram-matches `text`,
    /// ordered by descending similarity.
    pub async fn trigram_title_search(
        &self,
        text: &str,
        k: usize,
    ) -> Result<Vec<TitleMatch>, VectorDbError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<(Uuid, String, Option<String>, f32)> = sqlx::query_as(
            "SELECT id, title, source, similarity(title, $1) AS sim \
             FROM documents \
             WHERE title IS NOT NULL AND title % $1 \
             ORDER BY sim DESC \
             LIMIT $2",
        )
        .bind(text)
        .bind(k as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(document_id, title, source, trigram_sim)| TitleMatch {
                document_id,
                title,
                source,
                trigram_sim,
            })
            .collect())
    }

    /// Follow-on lookup: up to [`MAX_CHUNKS_PER_DOCUMENT`] chunks for
    /// `document_id`, in ascending chunk-index order.
    pub async fn chunks_for_document(
        &self,
        document_id: Uuid,
    ) -> Result<Vec<KeywordChunk>, VectorDbError> {
        let rows: Vec<(Uuid, Uuid, i32, String, Option<String>)> = sqlx::query_as(
            "SELECT c.id, c.document_id, c.chunk_index, c.content, d.source \
             FROM chunks c JOIN documents d ON d.id = c.document_id \
             WHERE c.document_id = $1 \
             ORDER BY c.chunk_index ASC \
             LIMIT $2",
        )
        .bind(document_id)
        .bind(MAX_CHUNKS_PER_DOCUMENT)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(chunk_id, document_id, chunk_index, content, source)| KeywordChunk {
                chunk_id,
                document_id,
                chunk_index,
                content,
                source,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::MAX_CHUNKS_PER_DOCUMENT;

    #[test]
    fn max_chunks_per_document_invariant_is_two() {
        assert_eq!(MAX_CHUNKS_PER_DOCUMENT, 2);
    }
}
