use super::*;
use crate::embedding::EmbeddingBackend;
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

fn clear_oratio_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        for key in [
            "ORATIO_PORT",
            "ORATIO_BIND_ADDR",
            "RUBRIC_PATH",
            "FUZZY_THRESHOLD",
            "KEYWORD_WEIGHT",
            "SEMANTIC_WEIGHT",
            "LENGTH_PENALTY_UNDER_MIN",
            "LENGTH_PENALTY_OVER_MAX",
            "EMBEDDING_MODEL",
            "EMBEDDING_ALLOW_FALLBACK",
            "EMBEDDING_MODEL_DIR",
            "EMBEDDING_BACKEND",
        ] {
            env::remove_var(key);
        }
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.port, 8000);
    assert_eq!(
        config.bind_addr,
        IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
    );
    assert_eq!(config.rubric_path, PathBuf::from("data/rubric.csv"));
    assert_eq!(config.fuzzy_threshold, 85.0);
    assert_eq!(config.weights.keyword, 0.4);
    assert_eq!(config.weights.semantic, 0.6);
    assert_eq!(config.weights.penalty_under_min, -10.0);
    assert_eq!(config.weights.penalty_over_max, -5.0);
    assert!(config.embedding.allow_fallback);
    assert_eq!(config.embedding.embedding_dim, 384);
}

#[test]
fn test_socket_addr() {
    let config = Config::default();
    assert_eq!(config.socket_addr(), "127.0.0.1:8000");

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
    clear_oratio_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config.port, 8000);
    assert_eq!(config.weights, ScoringWeights::default());
    assert_eq!(config.embedding.backend, EmbeddingBackend::Candle);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_from_env_custom_values() {
    clear_oratio_env();

    with_env_vars(
        &[
            ("ORATIO_PORT", "3000"),
            ("ORATIO_BIND_ADDR", "::1"),
            ("RUBRIC_PATH", "/srv/rubrics/panel.csv"),
            ("FUZZY_THRESHOLD", "90"),
            ("KEYWORD_WEIGHT", "0.5"),
            ("SEMANTIC_WEIGHT", " 0.5 "),
            ("LENGTH_PENALTY_UNDER_MIN", "-20"),
            ("LENGTH_PENALTY_OVER_MAX", "-2.5"),
            ("EMBEDDING_ALLOW_FALLBACK", "0"),
            ("EMBEDDING_BACKEND", "none"),
        ],
        || {
            let config = Config::from_env().expect("should parse");

            assert_eq!(config.port, 3000);
            assert_eq!(
                config.bind_addr,
                IpAddr::V6(std::net::Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 1))
            );
            assert_eq!(config.rubric_path, PathBuf::from("/srv/rubrics/panel.csv"));
            assert_eq!(config.fuzzy_threshold, 90.0);
            assert_eq!(
                config.weights,
                ScoringWeights {
                    keyword: 0.5,
                    semantic: 0.5,
                    penalty_under_min: -20.0,
                    penalty_over_max: -2.5,
                }
            );
            assert!(!config.embedding.allow_fallback);
            assert_eq!(config.embedding.backend, EmbeddingBackend::Unavailable);
        },
    );
}

#[test]
#[serial]
fn test_blank_numeric_uses_default() {
    clear_oratio_env();

    with_env_vars(&[("KEYWORD_WEIGHT", "  ")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.weights.keyword, 0.4);
    });
}

#[test]
#[serial]
fn test_invalid_weight_not_number() {
    clear_oratio_env();

    with_env_vars(&[("SEMANTIC_WEIGHT", "lots")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NumberParseError {
                name: "SEMANTIC_WEIGHT",
                ..
            }
        ));
        assert!(err.to_string().contains("SEMANTIC_WEIGHT='lots'"));
    });
}

#[test]
#[serial]
fn test_invalid_port_zero() {
    clear_oratio_env();

    with_env_vars(&[("ORATIO_PORT", "0")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
        assert!(err.to_string().contains("invalid port"));
    });
}

#[test]
#[serial]
fn test_invalid_port_not_number() {
    clear_oratio_env();

    with_env_vars(&[("ORATIO_PORT", "not_a_port")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::PortParseError { .. }));
        assert!(err.to_string().contains("failed to parse port"));
    });
}

#[test]
#[serial]
fn test_invalid_bind_addr() {
    clear_oratio_env();

    with_env_vars(&[("ORATIO_BIND_ADDR", "not.an.ip.address")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBindAddr { .. }));
        assert!(err.to_string().contains("failed to parse bind address"));
    });
}

#[test]
fn test_validate_positive_penalty() {
    let config = Config {
        weights: ScoringWeights {
            penalty_over_max: 5.0,
            ..Default::default()
        },
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::OutOfRange {
            name: "LENGTH_PENALTY_OVER_MAX",
            ..
        }
    ));
}

#[test]
fn test_validate_negative_weight() {
    let weights = ScoringWeights {
        keyword: -0.1,
        ..Default::default()
    };
    assert!(matches!(
        weights.validate(),
        Err(ConfigError::OutOfRange {
            name: "KEYWORD_WEIGHT",
            ..
        })
    ));

    let weights = ScoringWeights {
        semantic: f64::NAN,
        ..Default::default()
    };
    assert!(weights.validate().is_err());
}

#[test]
fn test_validate_fuzzy_threshold_range() {
    let config = Config {
        fuzzy_threshold: 101.0,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::OutOfRange {
            name: "FUZZY_THRESHOLD",
            ..
        })
    ));

    let config = Config {
        fuzzy_threshold: 0.0,
        ..Default::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rubric_path_is_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config {
        rubric_path: dir.path().to_path_buf(),
        ..Default::default()
    };

    assert!(matches!(config.validate(), Err(ConfigError::NotAFile { .. })));
}

#[test]
fn test_validate_missing_rubric_is_fine() {
    let config = Config {
        rubric_path: PathBuf::from("/nonexistent/rubric.csv"),
        ..Default::default()
    };
    assert!(config.validate().is_ok());
}
