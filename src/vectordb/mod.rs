//! Vector-store adapters (C3): cosine top-k over a primary relational store
//! (Postgres + pgvector) and an optional mirrored secondary store (Qdrant).

pub mod error;
pub mod model;
pub mod primary;
pub mod secondary;

pub use error::VectorDbError;
pub use model::VectorSearchHit;
pub use primary::PrimaryStore;
pub use secondary::{DEFAULT_COLLECTION_NAME, SecondaryStore};
