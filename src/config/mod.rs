//! Environment configuration.
//!
//! Every tunable named in the external interface's configuration table lives
//! here as a typed field with an explicit default, following the same
//! `ENV_*` const + `parse_*_from_env` helper shape the teacher used for its
//! handful of server settings.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use crate::constants::{
    DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_EMBEDDING_DIM,
    DEFAULT_GRADE_HIGH_THRESHOLD, DEFAULT_GRADE_MEDIUM_THRESHOLD, DEFAULT_HYBRID_KEYWORD_WEIGHT,
    DEFAULT_HYBRID_VECTOR_WEIGHT, DEFAULT_MAX_ALLOWED_DOMAINS, DEFAULT_MAX_VERIFICATION_LOOPS,
    DEFAULT_MIN_TECHNICAL_TERM_LENGTH, DEFAULT_RAG_TOP_K, DEFAULT_VERIFICATION_THRESHOLD,
    DEFAULT_WEB_SEARCH_CONCURRENT_REQUESTS, DEFAULT_WEB_SEARCH_FAILURE_THROTTLE_MS,
};
use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

/// Process-wide configuration, assembled once at boot from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    // --- transport ---
    pub port: u16,
    pub bind_addr: IpAddr,

    // --- stores ---
    pub storage_path: PathBuf,
    pub model_path: Option<PathBuf>,
    pub reranker_path: Option<PathBuf>,
    pub qdrant_url: String,
    pub postgres_url: String,
    pub use_dual_vector_store: bool,

    // --- embedding / ingestion ---
    pub embedding_dimensions: usize,
    pub chunk_size: usize,
    pub chunk_overlap: usize,

    // --- hybrid retrieval ---
    pub hybrid_vector_weight: f32,
    pub hybrid_keyword_weight: f32,
    pub rag_top_k: usize,

    // --- coordinator loop ---
    pub max_verification_loops: u32,
    pub allow_low_grade_fallback: bool,
    pub cache_failures: bool,
    pub enable_query_rewriting: bool,

    // --- classifier ---
    pub use_llm_classifier: bool,

    // --- grader ---
    pub use_semantic_grading: bool,
    pub grade_high_threshold: f32,
    pub grade_medium_threshold: f32,

    // --- verifier ---
    pub verification_threshold: f32,
    pub min_technical_term_length: usize,

    // --- web search ---
    pub web_search_concurrent_requests: usize,
    pub web_search_failure_throttle_base_ms: u64,
    pub web_search_context_size: usize,
    pub web_search_location: Option<String>,
    pub web_search_allowlist: Vec<String>,

    // --- sql sub-agent ---
    pub enable_sql_agent: bool,
    pub sql_agent_cost_cap: Option<f64>,
    pub sql_agent_row_cap: Option<u64>,
    pub sql_agent_timeout_ms: Option<u64>,
    pub sql_agent_allowlist: Vec<String>,
}

pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
pub const DEFAULT_POSTGRES_URL: &str = "postgres://localhost:5432/lantern";

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),

            storage_path: PathBuf::from("./.data"),
            model_path: None,
            reranker_path: None,
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            postgres_url: DEFAULT_POSTGRES_URL.to_string(),
            use_dual_vector_store: false,

            embedding_dimensions: DEFAULT_EMBEDDING_DIM,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,

            hybrid_vector_weight: DEFAULT_HYBRID_VECTOR_WEIGHT,
            hybrid_keyword_weight: DEFAULT_HYBRID_KEYWORD_WEIGHT,
            rag_top_k: DEFAULT_RAG_TOP_K,

            max_verification_loops: DEFAULT_MAX_VERIFICATION_LOOPS,
            allow_low_grade_fallback: false,
            cache_failures: false,
            enable_query_rewriting: false,

            use_llm_classifier: false,

            use_semantic_grading: false,
            grade_high_threshold: DEFAULT_GRADE_HIGH_THRESHOLD,
            grade_medium_threshold: DEFAULT_GRADE_MEDIUM_THRESHOLD,

            verification_threshold: DEFAULT_VERIFICATION_THRESHOLD,
            min_technical_term_length: DEFAULT_MIN_TECHNICAL_TERM_LENGTH,

            web_search_concurrent_requests: DEFAULT_WEB_SEARCH_CONCURRENT_REQUESTS,
            web_search_failure_throttle_base_ms: DEFAULT_WEB_SEARCH_FAILURE_THROTTLE_MS,
            web_search_context_size: 5,
            web_search_location: None,
            web_search_allowlist: Vec::new(),

            enable_sql_agent: false,
            sql_agent_cost_cap: None,
            sql_agent_row_cap: None,
            sql_agent_timeout_ms: None,
            sql_agent_allowlist: Vec::new(),
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "LANTERN_PORT";
    const ENV_BIND_ADDR: &'static str = "LANTERN_BIND_ADDR";
    const ENV_STORAGE_PATH: &'static str = "LANTERN_STORAGE_PATH";
    const ENV_MODEL_PATH: &'static str = "LANTERN_MODEL_PATH";
    const ENV_RERANKER_PATH: &'static str = "LANTERN_RERANKER_PATH";
    const ENV_QDRANT_URL: &'static str = "LANTERN_QDRANT_URL";
    const ENV_POSTGRES_URL: &'static str = "LANTERN_POSTGRES_URL";
    const ENV_USE_DUAL_VECTOR_STORE: &'static str = "USE_DUAL_VECTOR_STORE";

    const ENV_EMBEDDING_DIMENSIONS: &'static str = "EMBEDDING_DIMENSIONS";
    const ENV_CHUNK_SIZE: &'static str = "CHUNK_SIZE";
    const ENV_CHUNK_OVERLAP: &'static str = "CHUNK_OVERLAP";

    const ENV_HYBRID_VECTOR_WEIGHT: &'static str = "HYBRID_VECTOR_WEIGHT";
    const ENV_HYBRID_KEYWORD_WEIGHT: &'static str = "HYBRID_KEYWORD_WEIGHT";
    const ENV_RAG_TOP_K: &'static str = "RAG_TOP_K";

    const ENV_MAX_VERIFICATION_LOOPS: &'static str = "MAX_VERIFICATION_LOOPS";
    const ENV_ALLOW_LOW_GRADE_FALLBACK: &'static str = "ALLOW_LOW_GRADE_FALLBACK";
    const ENV_CACHE_FAILURES: &'static str = "CACHE_FAILURES";
    const ENV_ENABLE_QUERY_REWRITING: &'static str = "ENABLE_QUERY_REWRITING";

    const ENV_USE_LLM_CLASSIFIER: &'static str = "USE_LLM_CLASSIFIER";

    const ENV_USE_SEMANTIC_GRADING: &'static str = "USE_SEMANTIC_GRADING";
    const ENV_GRADE_HIGH_THRESHOLD: &'static str = "GRADE_HIGH_THRESHOLD";
    const ENV_GRADE_MEDIUM_THRESHOLD: &'static str = "GRADE_MEDIUM_THRESHOLD";

    const ENV_VERIFICATION_THRESHOLD: &'static str = "VERIFICATION_THRESHOLD";
    const ENV_MIN_TECHNICAL_TERM_LENGTH: &'static str = "MIN_TECHNICAL_TERM_LENGTH";

    const ENV_WEB_SEARCH_CONCURRENT_REQUESTS: &'static str = "WEB_SEARCH_CONCURRENT_REQUESTS";
    const ENV_WEB_SEARCH_FAILURE_THROTTLE_BASE_MS: &'static str =
        "WEB_SEARCH_FAILURE_THROTTLE_BASE_MS";
    const ENV_WEB_SEARCH_CONTEXT_SIZE: &'static str = "WEB_SEARCH_CONTEXT_SIZE";
    const ENV_WEB_SEARCH_LOCATION: &'static str = "WEB_SEARCH_LOCATION";
    const ENV_WEB_SEARCH_ALLOWLIST: &'static str = "WEB_SEARCH_ALLOWLIST";

    const ENV_ENABLE_SQL_AGENT: &'static str = "ENABLE_SQL_AGENT";
    const ENV_SQL_AGENT_COST_CAP: &'static str = "SQL_AGENT_COST_CAP";
    const ENV_SQL_AGENT_ROW_CAP: &'static str = "SQL_AGENT_ROW_CAP";
    const ENV_SQL_AGENT_TIMEOUT_MS: &'static str = "SQL_AGENT_TIMEOUT_MS";
    const ENV_SQL_AGENT_ALLOWLIST: &'static str = "SQL_AGENT_ALLOWLIST";

    /// Loads configuration from the environment, falling back to documented
    /// defaults for every key except `EMBEDDING_DIMENSIONS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let storage_path = Self::parse_path_from_env(Self::ENV_STORAGE_PATH, defaults.storage_path);
        let model_path = Self::parse_optional_path_from_env(Self::ENV_MODEL_PATH);
        let reranker_path = Self::parse_optional_path_from_env(Self::ENV_RERANKER_PATH);
        let qdrant_url = Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url);
        let postgres_url =
            Self::parse_string_from_env(Self::ENV_POSTGRES_URL, defaults.postgres_url);
        let use_dual_vector_store = Self::parse_bool_from_env(
            Self::ENV_USE_DUAL_VECTOR_STORE,
            defaults.use_dual_vector_store,
        );

        let embedding_dimensions = Self::parse_required_usize_from_env(
            Self::ENV_EMBEDDING_DIMENSIONS,
            defaults.embedding_dimensions,
        );
        let chunk_size =
            Self::parse_usize_from_env(Self::ENV_CHUNK_SIZE, defaults.chunk_size)?;
        let chunk_overlap =
            Self::parse_usize_from_env(Self::ENV_CHUNK_OVERLAP, defaults.chunk_overlap)?;

        let hybrid_vector_weight = Self::parse_f32_from_env(
            Self::ENV_HYBRID_VECTOR_WEIGHT,
            defaults.hybrid_vector_weight,
        )?;
        let hybrid_keyword_weight = Self::parse_f32_from_env(
            Self::ENV_HYBRID_KEYWORD_WEIGHT,
            defaults.hybrid_keyword_weight,
        )?;
        let rag_top_k = Self::parse_usize_from_env(Self::ENV_RAG_TOP_K, defaults.rag_top_k)?;

        let max_verification_loops = Self::parse_u32_from_env(
            Self::ENV_MAX_VERIFICATION_LOOPS,
            defaults.max_verification_loops,
        )?;
        let allow_low_grade_fallback = Self::parse_bool_from_env(
            Self::ENV_ALLOW_LOW_GRADE_FALLBACK,
            defaults.allow_low_grade_fallback,
        );
        let cache_failures =
            Self::parse_bool_from_env(Self::ENV_CACHE_FAILURES, defaults.cache_failures);
        let enable_query_rewriting = Self::parse_bool_from_env(
            Self::ENV_ENABLE_QUERY_REWRITING,
            defaults.enable_query_rewriting,
        );

        let use_llm_classifier = Self::parse_bool_from_env(
            Self::ENV_USE_LLM_CLASSIFIER,
            defaults.use_llm_classifier,
        );

        let use_semantic_grading = Self::parse_bool_from_env(
            Self::ENV_USE_SEMANTIC_GRADING,
            defaults.use_semantic_grading,
        );
        let grade_high_threshold = Self::parse_f32_from_env(
            Self::ENV_GRADE_HIGH_THRESHOLD,
            defaults.grade_high_threshold,
        )?;
        let grade_medium_threshold = Self::parse_f32_from_env(
            Self::ENV_GRADE_MEDIUM_THRESHOLD,
            defaults.grade_medium_threshold,
        )?;

        let verification_threshold = Self::parse_f32_from_env(
            Self::ENV_VERIFICATION_THRESHOLD,
            defaults.verification_threshold,
        )?;
        let min_technical_term_length = Self::parse_usize_from_env(
            Self::ENV_MIN_TECHNICAL_TERM_LENGTH,
            defaults.min_technical_term_length,
        )?;

        let web_search_concurrent_requests = Self::parse_usize_from_env(
            Self::ENV_WEB_SEARCH_CONCURRENT_REQUESTS,
            defaults.web_search_concurrent_requests,
        )?;
        let web_search_failure_throttle_base_ms = Self::parse_u64_from_env(
            Self::ENV_WEB_SEARCH_FAILURE_THROTTLE_BASE_MS,
            defaults.web_search_failure_throttle_base_ms,
        );
        let web_search_context_size = Self::parse_usize_from_env(
            Self::ENV_WEB_SEARCH_CONTEXT_SIZE,
            defaults.web_search_context_size,
        )?;
        let web_search_location = env::var(Self::ENV_WEB_SEARCH_LOCATION).ok();
        let web_search_allowlist = Self::parse_allowlist_from_env(
            Self::ENV_WEB_SEARCH_ALLOWLIST,
            DEFAULT_MAX_ALLOWED_DOMAINS,
        );

        let enable_sql_agent =
            Self::parse_bool_from_env(Self::ENV_ENABLE_SQL_AGENT, defaults.enable_sql_agent);
        let sql_agent_cost_cap = env::var(Self::ENV_SQL_AGENT_COST_CAP)
            .ok()
            .and_then(|v| v.parse().ok());
        let sql_agent_row_cap = env::var(Self::ENV_SQL_AGENT_ROW_CAP)
            .ok()
            .and_then(|v| v.parse().ok());
        let sql_agent_timeout_ms = env::var(Self::ENV_SQL_AGENT_TIMEOUT_MS)
            .ok()
            .and_then(|v| v.parse().ok());
        let sql_agent_allowlist =
            Self::parse_allowlist_from_env(Self::ENV_SQL_AGENT_ALLOWLIST, usize::MAX);

        Ok(Self {
            port,
            bind_addr,
            storage_path,
            model_path,
            reranker_path,
            qdrant_url,
            postgres_url,
            use_dual_vector_store,
            embedding_dimensions,
            chunk_size,
            chunk_overlap,
            hybrid_vector_weight,
            hybrid_keyword_weight,
            rag_top_k,
            max_verification_loops,
            allow_low_grade_fallback,
            cache_failures,
            enable_query_rewriting,
            use_llm_classifier,
            use_semantic_grading,
            grade_high_threshold,
            grade_medium_threshold,
            verification_threshold,
            min_technical_term_length,
            web_search_concurrent_requests,
            web_search_failure_throttle_base_ms,
            web_search_context_size,
            web_search_location,
            web_search_allowlist,
            enable_sql_agent,
            sql_agent_cost_cap,
            sql_agent_row_cap,
            sql_agent_timeout_ms,
            sql_agent_allowlist,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_path.exists() && !self.storage_path.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.storage_path.clone(),
            });
        }

        if let Some(ref path) = self.model_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        if let Some(ref path) = self.reranker_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        if self.embedding_dimensions == 0 {
            return Err(ConfigError::MissingEnvVar {
                name: Self::ENV_EMBEDDING_DIMENSIONS,
            });
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_usize_from_env(var_name: &'static str, default: usize) -> Result<usize, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidValue { name: var_name, value }),
            Err(_) => Ok(default),
        }
    }

    fn parse_required_usize_from_env(var_name: &'static str, default: usize) -> usize {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_u32_from_env(var_name: &'static str, default: u32) -> Result<u32, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidValue { name: var_name, value }),
            Err(_) => Ok(default),
        }
    }

    fn parse_f32_from_env(var_name: &'static str, default: f32) -> Result<f32, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidValue { name: var_name, value }),
            Err(_) => Ok(default),
        }
    }

    fn parse_bool_from_env(var_name: &str, default: bool) -> bool {
        match env::var(var_name) {
            Ok(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"),
            Err(_) => default,
        }
    }

    fn parse_allowlist_from_env(var_name: &str, cap: usize) -> Vec<String> {
        env::var(var_name)
            .ok()
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .take(cap)
                    .collect()
            })
            .unwrap_or_default()
    }
}
