use super::*;
use std::sync::Arc;

mod config_tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use std::path::PathBuf;

    fn clear_embedding_env() {
        // SAFETY: Test code only, we accept the thread-safety risk in tests.
        unsafe {
            env::remove_var(EmbeddingConfig::ENV_MODEL);
            env::remove_var(EmbeddingConfig::ENV_ALLOW_FALLBACK);
            env::remove_var(EmbeddingConfig::ENV_MODEL_DIR);
            env::remove_var(EmbeddingConfig::ENV_BACKEND);
        }
    }

    #[test]
    fn test_embedding_config_default() {
        let config = EmbeddingConfig::default();
        assert!(config.model_name.is_none());
        assert_eq!(config.default_model, "sentence-transformers/all-MiniLM-L6-v2");
        assert_eq!(config.embedding_dim, 384);
        assert!(config.allow_fallback);
        assert_eq!(config.backend, EmbeddingBackend::Candle);
        assert_eq!(config.model_dir, PathBuf::from("./models"));
    }

    #[test]
    fn test_parse_flag() {
        for truthy in ["1", "true", "TRUE", "Yes", " yes "] {
            assert!(parse_flag(truthy), "{truthy} should be truthy");
        }
        for falsy in ["0", "false", "no", "", "off", "2"] {
            assert!(!parse_flag(falsy), "{falsy} should be falsy");
        }
    }

    #[test]
    fn test_candidates_default_order() {
        let config = EmbeddingConfig::default();
        assert_eq!(
            config.candidates(None),
            vec![
                "sentence-transformers/all-MiniLM-L6-v2",
                "sentence-transformers/paraphrase-MiniLM-L3-v2",
                "sentence-transformers/all-MiniLM-L12-v2",
            ]
        );
    }

    #[test]
    fn test_candidates_explicit_beats_override() {
        let config = EmbeddingConfig {
            model_name: Some("custom/model".to_string()),
            ..Default::default()
        };
        let candidates = config.candidates(Some("explicit/model"));
        assert_eq!(candidates[0], "explicit/model");
        assert_eq!(candidates.len(), 4);

        let candidates = config.candidates(None);
        assert_eq!(candidates[0], "custom/model");
    }

    #[test]
    fn test_resolve_model_dir_under_root() {
        let config = EmbeddingConfig::default().with_model_dir("/opt/models");
        assert_eq!(
            config.resolve_model_dir("sentence-transformers/all-MiniLM-L6-v2"),
            PathBuf::from("/opt/models/sentence-transformers/all-MiniLM-L6-v2")
        );
    }

    #[test]
    fn test_resolve_model_dir_existing_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = EmbeddingConfig::default();
        let name = dir.path().to_string_lossy().to_string();
        assert_eq!(config.resolve_model_dir(&name), dir.path());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_embedding_env();
        let config = EmbeddingConfig::from_env();
        assert!(config.model_name.is_none());
        assert!(config.allow_fallback);
        assert_eq!(config.backend, EmbeddingBackend::Candle);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_embedding_env();
        // SAFETY: Test code only, we accept the thread-safety risk in tests.
        unsafe {
            env::set_var(EmbeddingConfig::ENV_MODEL, "sentence-transformers/all-MiniLM-L12-v2");
            env::set_var(EmbeddingConfig::ENV_ALLOW_FALLBACK, "0");
            env::set_var(EmbeddingConfig::ENV_MODEL_DIR, "/srv/models");
            env::set_var(EmbeddingConfig::ENV_BACKEND, "none");
        }

        let config = EmbeddingConfig::from_env();
        clear_embedding_env();

        assert_eq!(
            config.model_name.as_deref(),
            Some("sentence-transformers/all-MiniLM-L12-v2")
        );
        assert!(!config.allow_fallback);
        assert_eq!(config.model_dir, PathBuf::from("/srv/models"));
        assert_eq!(config.backend, EmbeddingBackend::Unavailable);
    }
}

mod provider_tests {
    use super::*;

    #[test]
    fn test_stub_provider_returns_zero_vectors() {
        let provider = EmbeddingProvider::stub();
        assert!(provider.model_name().is_none());
        assert!(!provider.is_fallback());

        let model = provider.load_model(None).expect("fallback allowed");
        assert!(model.is_fallback());
        assert_eq!(model.name(), ZeroEmbedder::NAME);
        assert!(provider.is_fallback());
        assert_eq!(provider.model_name().as_deref(), Some(ZeroEmbedder::NAME));

        let emb = provider.embed("anything").expect("embed");
        assert_eq!(emb.len(), 384);
        assert!(emb.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_backend_unavailable_without_fallback_fails() {
        let config = EmbeddingConfig::stub().with_allow_fallback(false);
        let provider = EmbeddingProvider::new(config);

        let err = provider.load_model(None).unwrap_err();
        assert!(matches!(err, EmbeddingError::InitializationFailed { .. }));
        assert!(!provider.is_loaded());
    }

    #[test]
    fn test_missing_model_files_fall_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = EmbeddingConfig::default().with_model_dir(dir.path());
        let provider = EmbeddingProvider::new(config);

        let model = provider.load_model(None).expect("fallback allowed");
        assert!(model.is_fallback());
        assert_eq!(model.dim(), 384);
    }

    #[test]
    fn test_missing_model_files_without_fallback_fail() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = EmbeddingConfig::default()
            .with_model_dir(dir.path())
            .with_allow_fallback(false);
        let provider = EmbeddingProvider::new(config);

        let err = provider.load_model(Some("missing/model")).unwrap_err();
        match err {
            EmbeddingError::InitializationFailed { reason } => {
                assert!(reason.contains("EMBEDDING_ALLOW_FALLBACK"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_incomplete_model_dir_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("config.json"), "{}").expect("write config");

        let err = SentenceEncoder::load("partial", dir.path(), 128).unwrap_err();
        assert!(matches!(err, EmbeddingError::ModelNotFound { .. }));
    }

    #[test]
    fn test_load_model_is_shared() {
        let provider = EmbeddingProvider::stub();
        let first = provider.load_model(None).expect("load");
        let second = provider.load_model(Some("ignored/after/first")).expect("load");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_concurrent_first_load_yields_one_model() {
        let provider = Arc::new(EmbeddingProvider::stub());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let provider = Arc::clone(&provider);
                std::thread::spawn(move || provider.load_model(None).expect("load"))
            })
            .collect();

        let models: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().expect("thread"))
            .collect();
        for model in &models[1..] {
            assert!(Arc::ptr_eq(&models[0], model));
        }
    }

    #[test]
    fn test_with_embedder_skips_resolution() {
        let provider = EmbeddingProvider::with_embedder(Arc::new(MockEmbedder::new(16)));
        assert!(provider.is_loaded());
        assert_eq!(provider.embed("hello").expect("embed").len(), 16);
    }

    #[test]
    fn test_embed_batch_one_vector_per_input() {
        let provider = EmbeddingProvider::stub();
        let out = provider
            .embed_batch(&["one", "two", "three"])
            .expect("batch");
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|v| v.len() == 384));
        assert!(provider.embed_batch(&[]).expect("empty").is_empty());
    }
}

mod similarity_tests {
    use super::*;

    #[test]
    fn test_cosine_self_is_one() {
        let v = [0.3f32, -1.2, 4.0, 0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_zero_vector_is_zero() {
        let v = [1.0f32, 2.0, 3.0];
        assert_eq!(cosine_similarity(&v, &[0.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_cosine_shape_mismatch_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_cosine_opposite_and_orthogonal() {
        assert!((cosine_similarity(&[1.0, 0.0], &[-2.0, 0.0]) + 1.0).abs() < 1e-9);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 3.0]), 0.0);
    }

    #[test]
    fn test_mock_embedder_shared_words_are_similar() {
        let model = MockEmbedder::new(384);
        let a = model.embed("coding music sports").expect("embed");
        let b = model.embed("I like coding and music").expect("embed");
        let c = model.embed("").expect("embed");

        assert!(cosine_similarity(&a, &b) > 0.0);
        assert_eq!(cosine_similarity(&a, &c), 0.0);
    }
}
