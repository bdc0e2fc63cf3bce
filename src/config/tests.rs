use super::*;
use serial_test::serial;
use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

const ALL_ENV_KEYS: &[&str] = &[
    "LANTERN_PORT",
    "LANTERN_BIND_ADDR",
    "LANTERN_STORAGE_PATH",
    "LANTERN_MODEL_PATH",
    "LANTERN_RERANKER_PATH",
    "LANTERN_QDRANT_URL",
    "LANTERN_POSTGRES_URL",
    "USE_DUAL_VECTOR_STORE",
    "EMBEDDING_DIMENSIONS",
    "CHUNK_SIZE",
    "CHUNK_OVERLAP",
    "HYBRID_VECTOR_WEIGHT",
    "HYBRID_KEYWORD_WEIGHT",
    "RAG_TOP_K",
    "MAX_VERIFICATION_LOOPS",
    "ALLOW_LOW_GRADE_FALLBACK",
    "CACHE_FAILURES",
    "ENABLE_QUERY_REWRITING",
    "USE_LLM_CLASSIFIER",
    "USE_SEMANTIC_GRADING",
    "GRADE_HIGH_THRESHOLD",
    "GRADE_MEDIUM_THRESHOLD",
    "VERIFICATION_THRESHOLD",
    "MIN_TECHNICAL_TERM_LENGTH",
    "WEB_SEARCH_CONCURRENT_REQUESTS",
    "WEB_SEARCH_FAILURE_THROTTLE_BASE_MS",
    "WEB_SEARCH_CONTEXT_SIZE",
    "WEB_SEARCH_LOCATION",
    "WEB_SEARCH_ALLOWLIST",
    "ENABLE_SQL_AGENT",
    "SQL_AGENT_COST_CAP",
    "SQL_AGENT_ROW_CAP",
    "SQL_AGENT_TIMEOUT_MS",
    "SQL_AGENT_ALLOWLIST",
];

fn clear_lantern_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        for key in ALL_ENV_KEYS {
            env::remove_var(key);
        }
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.port, 8080);
    assert_eq!(
        config.bind_addr,
        IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
    );
    assert_eq!(config.storage_path, PathBuf::from("./.data"));
    assert!(config.model_path.is_none());
    assert!(config.reranker_path.is_none());
    assert_eq!(config.qdrant_url, "http://localhost:6334");
    assert_eq!(config.embedding_dimensions, 1536);
    assert_eq!(config.chunk_size, 1000);
    assert_eq!(config.chunk_overlap, 100);
    assert_eq!(config.hybrid_vector_weight, 0.7);
    assert_eq!(config.hybrid_keyword_weight, 0.3);
    assert_eq!(config.max_verification_loops, 2);
    assert!(!config.use_dual_vector_store);
    assert!(!config.enable_sql_agent);
}

#[test]
fn test_socket_addr() {
    let config = Config::default();
    assert_eq!(config.socket_addr(), "127.0.0.1:8080");

    let config = Config {
        port: 3000,
        bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0)),
        ..Default::default()
    };
    assert_eq!(config.socket_addr(), "0.0.0.0:3000");
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_lantern_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config.port, 8080);
    assert_eq!(
        config.bind_addr,
        IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
    );
}

#[test]
#[serial]
fn test_from_env_custom_port() {
    clear_lantern_env();

    with_env_vars(&[("LANTERN_PORT", "3000")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.port, 3000);
    });
}

#[test]
#[serial]
fn test_from_env_custom_bind_addr() {
    clear_lantern_env();

    with_env_vars(&[("LANTERN_BIND_ADDR", "0.0.0.0")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(
            config.bind_addr,
            IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0))
        );
    });
}

#[test]
#[serial]
fn test_from_env_ipv6_bind_addr() {
    clear_lantern_env();

    with_env_vars(&[("LANTERN_BIND_ADDR", "::1")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(
            config.bind_addr,
            IpAddr::V6(std::net::Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 1))
        );
    });
}

#[test]
#[serial]
fn test_from_env_custom_paths() {
    clear_lantern_env();

    with_env_vars(
        &[
            ("LANTERN_STORAGE_PATH", "/mnt/nvme/lantern_data"),
            ("LANTERN_MODEL_PATH", "/models/qwen3-8b-q4.gguf"),
            ("LANTERN_RERANKER_PATH", "/models/modernbert-gte"),
        ],
        || {
            let config = Config::from_env().expect("should parse");

            assert_eq!(config.storage_path, PathBuf::from("/mnt/nvme/lantern_data"));
            assert_eq!(
                config.model_path,
                Some(PathBuf::from("/models/qwen3-8b-q4.gguf"))
            );
            assert_eq!(
                config.reranker_path,
                Some(PathBuf::from("/models/modernbert-gte"))
            );
        },
    );
}

#[test]
#[serial]
fn test_invalid_port_zero() {
    clear_lantern_env();

    with_env_vars(&[("LANTERN_PORT", "0")], || {
        let result = Config::from_env();
        assert!(result.is_err());

        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
        assert!(err.to_string().contains("invalid port"));
    });
}

#[test]
#[serial]
fn test_invalid_port_not_number() {
    clear_lantern_env();

    with_env_vars(&[("LANTERN_PORT", "not_a_port")], || {
        let result = Config::from_env();
        assert!(result.is_err());

        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::PortParseError { .. }));
        assert!(err.to_string().contains("failed to parse port"));
    });
}

#[test]
#[serial]
fn test_invalid_bind_addr() {
    clear_lantern_env();

    with_env_vars(&[("LANTERN_BIND_ADDR", "not.an.ip.address")], || {
        let result = Config::from_env();
        assert!(result.is_err());

        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBindAddr { .. }));
        assert!(err.to_string().contains("failed to parse bind address"));
    });
}

#[test]
fn test_validate_nonexistent_model_path() {
    let config = Config {
        model_path: Some(PathBuf::from("/nonexistent/path/to/model.gguf")),
        ..Default::default()
    };

    let result = config.validate();
    assert!(result.is_err());
    assert!(matches!(result.unwrap_err(), ConfigError::PathNotFound { .. }));
}

#[test]
fn test_validate_storage_path_is_file() {
    let config = Config {
        storage_path: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml"),
        ..Default::default()
    };

    let result = config.validate();
    assert!(result.is_err());
    assert!(matches!(result.unwrap_err(), ConfigError::NotADirectory { .. }));
}

#[test]
fn test_validate_success_with_defaults() {
    let config = Config::default();
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_from_env_hybrid_and_grading_overrides() {
    clear_lantern_env();

    with_env_vars(
        &[
            ("HYBRID_VECTOR_WEIGHT", "0.6"),
            ("HYBRID_KEYWORD_WEIGHT", "0.4"),
            ("USE_SEMANTIC_GRADING", "true"),
            ("GRADE_HIGH_THRESHOLD", "0.8"),
            ("VERIFICATION_THRESHOLD", "0.65"),
        ],
        || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(config.hybrid_vector_weight, 0.6);
            assert_eq!(config.hybrid_keyword_weight, 0.4);
            assert!(config.use_semantic_grading);
            assert_eq!(config.grade_high_threshold, 0.8);
            assert_eq!(config.verification_threshold, 0.65);
        },
    );
}

#[test]
#[serial]
fn test_from_env_web_search_allowlist_is_comma_separated() {
    clear_lantern_env();

    with_env_vars(
        &[("WEB_SEARCH_ALLOWLIST", "example.com, docs.rs ,rust-lang.org")],
        || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(
                config.web_search_allowlist,
                vec!["example.com", "docs.rs", "rust-lang.org"]
            );
        },
    );
}

#[test]
#[serial]
fn test_from_env_invalid_numeric_value_is_error() {
    clear_lantern_env();

    with_env_vars(&[("RAG_TOP_K", "not_a_number")], || {
        let result = Config::from_env();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    });
}

#[test]
#[serial]
fn test_from_env_bool_flags_accept_common_truthy_forms() {
    clear_lantern_env();

    for value in ["1", "true", "TRUE", "yes"] {
        with_env_vars(&[("ENABLE_SQL_AGENT", value)], || {
            let config = Config::from_env().expect("should parse");
            assert!(config.enable_sql_agent, "expected true for {value:?}");
        });
    }

    with_env_vars(&[("ENABLE_SQL_AGENT", "0")], || {
        let config = Config::from_env().expect("should parse");
        assert!(!config.enable_sql_agent);
    });
}

#[test]
fn test_error_messages_are_descriptive() {
    let err = ConfigError::InvalidPort {
        value: "0".to_string(),
    };
    assert!(err.to_string().contains("invalid port"));
    assert!(err.to_string().contains("0"));
    assert!(err.to_string().contains("1 and 65535"));

    let err = ConfigError::PathNotFound {
        path: PathBuf::from("/some/path"),
    };
    assert!(err.to_string().contains("/some/path"));

    let err = ConfigError::MissingEnvVar {
        name: "EMBEDDING_DIMENSIONS",
    };
    assert!(err.to_string().contains("EMBEDDING_DIMENSIONS"));
}
