//! Unit tests for configuration module
//!
//! These tests validate configuration parsing, defaults, and validation.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use crate::config::*;
    use crate::DocBotError;

    // ====== Default Value Tests ======

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();

        assert_eq!(config.documents.path, "./documents/");
        assert_eq!(config.documents.chunk_size, 1000);
        assert_eq!(config.documents.chunk_overlap, 200);
        assert_eq!(config.collection(), "demo1");
        assert_eq!(config.embedding_dimension(), 384);
        assert_eq!(config.embedding_model(), "all-minilm");
        assert_eq!(config.llm_model(), "gpt-3.5-turbo");
        assert_eq!(config.llm.temperature, 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_retrieval_defaults() {
        let config = RetrievalConfig::default();

        assert_eq!(config.search_type, SearchType::Mmr);
        assert_eq!(config.k, 3);
        assert_eq!(config.fetch_k, 4);
        assert_eq!(config.lambda_mult, 0.5);
    }

    // ====== Parsing Tests ======

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [documents]
            path = "/srv/docs"

            [retrieval]
            search_type = "similarity"
            k = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.documents.path, "/srv/docs");
        assert_eq!(config.documents.chunk_size, 1000);
        assert_eq!(config.retrieval.search_type, SearchType::Similarity);
        assert_eq!(config.retrieval.k, 5);
        assert_eq!(config.retrieval.fetch_k, 4);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [vector_store]
            collection = "handbook"

            [llm]
            llm_model = "gpt-4o-mini"
            "#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.collection(), "handbook");
        assert_eq!(config.llm_model(), "gpt-4o-mini");
        assert_eq!(config.llm_endpoint(), "https://api.openai.com/v1");
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let result = AppConfig::from_toml_str("[documents\npath = 1");
        assert!(matches!(result, Err(DocBotError::TomlParsing(_))));
    }

    // ====== Validation Tests ======

    #[test]
    fn test_overlap_larger_than_chunk_is_rejected() {
        let result = AppConfig::from_toml_str(
            r#"
            [documents]
            chunk_size = 100
            chunk_overlap = 200
            "#,
        );
        assert!(matches!(result, Err(DocBotError::ConfigError(_))));
    }

    #[test]
    fn test_lambda_out_of_range_is_rejected() {
        let mut config = AppConfig::default();
        config.retrieval.lambda_mult = 1.5;
        assert!(config.validate().is_err());
    }

    // ====== Environment Override Tests ======

    #[test]
    fn test_env_overrides_fill_missing_keys() {
        let env: HashMap<&str, &str> = [
            ("DATABASE_URL", "postgresql://env-host/docs"),
            ("OPENAI_API_KEY", "sk-test"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.embeddings.provider = "openai".to_string();
        config.apply_env_overrides_from(|key| env.get(key).map(ToString::to_string));

        assert_eq!(config.database_url(), "postgresql://env-host/docs");
        assert_eq!(config.llm_key(), "sk-test");
        assert_eq!(config.embeddings.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_env_overrides_keep_explicit_keys() {
        let mut config = AppConfig::default();
        config.llm.llm_key = "sk-from-file".to_string();
        config.apply_env_overrides_from(|key| {
            (key == "OPENAI_API_KEY").then(|| "sk-from-env".to_string())
        });

        assert_eq!(config.llm_key(), "sk-from-file");
        // Ollama embeddings never pick up the OpenAI key
        assert!(config.embeddings.api_key.is_none());
    }
}
