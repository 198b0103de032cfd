use super::*;
use crate::context::NO_CONTEXT_MARKER;
use crate::embedding::MockEmbedder;
use crate::index::IndexEntry;

const CORPUS: &str = "\
GN 1:1 No princípio criou Deus os céus e a terra
SL 23:1 O Senhor é o meu pastor, nada me faltará
JO 3:16 Porque Deus amou o mundo de tal maneira
1CO 13:4 O amor é paciente, o amor é bondoso
EF 4:32 Sede bondosos uns para com os outros, perdoando-vos";

fn corpus() -> Availability<Corpus> {
    Availability::ready(Corpus::parse(CORPUS))
}

fn entry(label: &str, text: &str, embedding: [f32; 2]) -> IndexEntry {
    IndexEntry::new(label, text, embedding.to_vec())
}

fn index() -> Availability<VectorIndex> {
    Availability::ready(
        VectorIndex::new(
            "mock",
            None,
            vec![
                entry("1CO 13:4", "O amor é paciente, o amor é bondoso", [1.0, 0.0]),
                entry("SL 23:1", "O Senhor é o meu pastor, nada me faltará", [0.0, 1.0]),
                entry("JO 3:16", "Porque Deus amou o mundo de tal maneira", [0.7, 0.7]),
            ],
        )
        .expect("index"),
    )
}

fn semantic() -> SemanticRetriever {
    SemanticRetriever::new(Arc::new(
        MockEmbedder::new()
            .with_vector("amor bondoso", vec![1.0, 0.1])
            .with_vector("pastor", vec![0.0, 1.0])
            .with_vector("Deus", vec![0.0, 1.0])
            .with_vector("xyz", vec![0.5, 0.5]),
    ))
}

mod backend_tests {
    use super::*;

    #[test]
    fn test_parse_backend() {
        assert_eq!("lexical".parse::<Backend>().expect("lexical"), Backend::Lexical);
        assert_eq!("SEMANTIC".parse::<Backend>().expect("semantic"), Backend::Semantic);
        assert_eq!(" hybrid ".parse::<Backend>().expect("hybrid"), Backend::Hybrid);
        assert!("faiss".parse::<Backend>().is_err());
    }

    #[test]
    fn test_backend_display_round_trips() {
        for backend in [Backend::Lexical, Backend::Semantic, Backend::Hybrid] {
            assert_eq!(backend.to_string().parse::<Backend>().expect("parse"), backend);
        }
        assert_eq!(Backend::default(), Backend::Lexical);
    }
}

mod lexical_engine_tests {
    use super::*;

    #[tokio::test]
    async fn test_lexical_found() {
        let engine = RetrievalEngine::new(Backend::Lexical, corpus());

        let result = engine.retrieve("O que é o amor?", 7).await.expect("retrieve");

        assert_eq!(
            result.rendered(),
            vec!["1CO 13:4: O amor é paciente, o amor é bondoso"]
        );
    }

    #[tokio::test]
    async fn test_lexical_no_match_is_ok() {
        let engine = RetrievalEngine::new(Backend::Lexical, corpus());

        let result = engine.retrieve("dinossauros", 7).await.expect("retrieve");
        assert!(result.is_no_match());

        let context = engine.context("dinossauros", 7).await.expect("context");
        assert_eq!(context.text(), NO_CONTEXT_MARKER);
    }

    #[tokio::test]
    async fn test_unavailable_corpus_is_error() {
        let engine = RetrievalEngine::new(
            Backend::Lexical,
            Availability::unavailable("biblia.txt: No such file or directory"),
        );

        let err = engine.retrieve("amor", 7).await.expect_err("unavailable");
        assert!(matches!(err, RetrievalError::CorpusUnavailable { .. }));
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_zero_limit_is_invalid() {
        let engine = RetrievalEngine::new(Backend::Lexical, corpus());
        assert!(matches!(
            engine.retrieve("amor", 0).await,
            Err(RetrievalError::InvalidLimit)
        ));
    }

    #[tokio::test]
    async fn test_context_respects_limit_and_budget() {
        let engine = RetrievalEngine::new(Backend::Lexical, corpus())
            .with_assembler(ContextAssembler::with_max_chars(30));

        let context = engine.context("Deus", 7).await.expect("context");

        assert_eq!(context.items(), 1);
        assert_eq!(context.text().chars().count(), 30);
        assert!(context.text().starts_with("GN 1:1: No princípio"));
    }
}

mod semantic_engine_tests {
    use super::*;

    #[tokio::test]
    async fn test_semantic_without_retriever_is_unavailable() {
        let engine = RetrievalEngine::new(Backend::Semantic, corpus());

        let err = engine.retrieve("amor", 3).await.expect_err("unavailable");
        assert!(matches!(err, RetrievalError::IndexUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_semantic_with_unloaded_index_is_unavailable() {
        let engine = RetrievalEngine::new(Backend::Semantic, corpus())
            .with_semantic(Availability::unavailable("index.rkyv missing"), semantic());

        let err = engine.retrieve("pastor", 3).await.expect_err("unavailable");
        assert!(matches!(
            err,
            RetrievalError::IndexUnavailable { ref reason } if reason == "index.rkyv missing"
        ));
    }

    #[tokio::test]
    async fn test_semantic_ranked_results() {
        let engine =
            RetrievalEngine::new(Backend::Semantic, corpus()).with_semantic(index(), semantic());

        let result = engine.retrieve("pastor", 2).await.expect("retrieve");

        assert_eq!(result.len(), 2);
        assert_eq!(result.passages()[0].label, "SL 23:1");
        assert_eq!(result.passages()[1].label, "JO 3:16");
    }
}

mod hybrid_engine_tests {
    use super::*;
    use crate::embedding::EmbeddingError;
    use async_trait::async_trait;

    /// Embedder whose service is down or answering with errors.
    struct FailingEmbedder {
        error: fn() -> EmbeddingError,
    }

    #[async_trait]
    impl QueryEmbedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
            Err((self.error)())
        }

        fn model_name(&self) -> &str {
            "failing"
        }
    }

    fn failing_semantic(error: fn() -> EmbeddingError) -> SemanticRetriever {
        SemanticRetriever::new(Arc::new(FailingEmbedder { error }))
    }

    #[tokio::test]
    async fn test_hybrid_degrades_when_embedder_is_down() {
        let engine = RetrievalEngine::new(Backend::Hybrid, corpus()).with_semantic(
            index(),
            failing_semantic(|| EmbeddingError::RequestFailed {
                endpoint: "http://127.0.0.1:11434/api/embeddings".to_string(),
                reason: "connection refused".to_string(),
            }),
        );

        let result = engine.retrieve("pastor", 7).await.expect("retrieve");
        assert_eq!(
            result.rendered(),
            vec!["SL 23:1: O Senhor é o meu pastor, nada me faltará"]
        );
    }

    #[tokio::test]
    async fn test_hybrid_degrades_on_embedder_error_status() {
        let engine = RetrievalEngine::new(Backend::Hybrid, corpus()).with_semantic(
            index(),
            failing_semantic(|| EmbeddingError::UnexpectedStatus {
                endpoint: "http://127.0.0.1:11434/api/embed".to_string(),
                status: 503,
                body: "model loading".to_string(),
            }),
        );

        let result = engine.retrieve("pastor", 7).await.expect("retrieve");
        assert_eq!(result.passages()[0].label, "SL 23:1");
    }

    #[tokio::test]
    async fn test_hybrid_propagates_malformed_embedding() {
        let engine = RetrievalEngine::new(Backend::Hybrid, corpus()).with_semantic(
            index(),
            failing_semantic(|| EmbeddingError::InvalidResponse {
                reason: "no embeddings".to_string(),
            }),
        );

        let err = engine.retrieve("pastor", 7).await.expect_err("malformed");
        assert!(matches!(err, RetrievalError::Embedding(_)));
    }

    #[tokio::test]
    async fn test_semantic_backend_still_fails_when_embedder_is_down() {
        let engine = RetrievalEngine::new(Backend::Semantic, corpus()).with_semantic(
            index(),
            failing_semantic(|| EmbeddingError::RequestFailed {
                endpoint: "http://127.0.0.1:11434/api/embed".to_string(),
                reason: "connection refused".to_string(),
            }),
        );

        let err = engine.retrieve("pastor", 7).await.expect_err("down");
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_hybrid_merges_semantic_first_and_dedups() {
        let engine =
            RetrievalEngine::new(Backend::Hybrid, corpus()).with_semantic(index(), semantic());

        let result = engine.retrieve("Deus", 7).await.expect("retrieve");
        let labels: Vec<&str> = result.passages().iter().map(|p| p.label.as_str()).collect();

        // Semantic: SL 23:1, JO 3:16, 1CO 13:4. Lexical: GN 1:1, JO 3:16.
        assert_eq!(labels, vec!["SL 23:1", "JO 3:16", "1CO 13:4", "GN 1:1"]);
    }

    #[tokio::test]
    async fn test_hybrid_truncates_to_limit() {
        let engine =
            RetrievalEngine::new(Backend::Hybrid, corpus()).with_semantic(index(), semantic());

        let result = engine.retrieve("Deus", 2).await.expect("retrieve");
        assert_eq!(result.len(), 2);
        assert_eq!(result.passages()[1].label, "JO 3:16");
    }

    #[tokio::test]
    async fn test_hybrid_degrades_to_lexical() {
        let engine = RetrievalEngine::new(Backend::Hybrid, corpus());

        let result = engine.retrieve("pastor", 7).await.expect("retrieve");
        assert_eq!(
            result.rendered(),
            vec!["SL 23:1: O Senhor é o meu pastor, nada me faltará"]
        );
    }

    #[tokio::test]
    async fn test_hybrid_degrades_to_semantic() {
        let engine = RetrievalEngine::new(Backend::Hybrid, Availability::unavailable("offline"))
            .with_semantic(index(), semantic());

        let result = engine.retrieve("pastor", 1).await.expect("retrieve");
        assert_eq!(result.passages()[0].label, "SL 23:1");
    }

    #[tokio::test]
    async fn test_hybrid_both_unavailable_reports_corpus() {
        let engine = RetrievalEngine::new(Backend::Hybrid, Availability::unavailable("offline"));

        let err = engine.retrieve("pastor", 7).await.expect_err("unavailable");
        assert!(matches!(err, RetrievalError::CorpusUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_hybrid_no_match_when_both_empty() {
        let empty_index =
            Availability::ready(VectorIndex::new("mock", None, vec![]).expect("index"));
        let engine =
            RetrievalEngine::new(Backend::Hybrid, corpus()).with_semantic(empty_index, semantic());

        let result = engine.retrieve("xyz", 7).await.expect("retrieve");
        assert!(result.is_no_match());
    }
}

mod config_tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn corpus_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("tempfile");
        file.write_all(CORPUS.as_bytes()).expect("write");
        file
    }

    #[tokio::test]
    async fn test_from_config_lexical() {
        let file = corpus_file();
        let config = Config {
            corpus_location: file.path().to_string_lossy().into_owned(),
            ..Default::default()
        };

        let engine = RetrievalEngine::from_config(&config).await;

        assert_eq!(engine.backend(), Backend::Lexical);
        assert_eq!(engine.corpus().get().map(|c| c.len()), Some(5));
        assert!(!engine.index().is_ready());
    }

    #[tokio::test]
    async fn test_from_config_missing_corpus_is_unavailable() {
        let config = Config {
            corpus_location: "/definitely/not/here.txt".to_string(),
            ..Default::default()
        };

        let engine = RetrievalEngine::from_config(&config).await;

        assert!(!engine.corpus().is_ready());
        assert!(engine.retrieve("amor", 7).await.is_err());
    }

    #[tokio::test]
    async fn test_from_config_semantic_with_stub_index() {
        let file = corpus_file();
        let dir = tempfile::TempDir::new().expect("tempdir");
        let index_path = dir.path().join("index.rkyv");

        let parsed = Corpus::parse(CORPUS);
        let stub = StubEmbedder::new(32).expect("stub");
        VectorIndex::build(&parsed, &stub)
            .await
            .expect("build")
            .save(&index_path)
            .expect("save");

        let config = Config {
            corpus_location: file.path().to_string_lossy().into_owned(),
            index_path: Some(index_path),
            backend: Backend::Semantic,
            ..Default::default()
        };

        let engine = RetrievalEngine::from_config(&config).await;
        assert_eq!(engine.index().get().map(|i| i.dim()), Some(32));

        let result = engine
            .retrieve("O Senhor é o meu pastor, nada me faltará", 1)
            .await
            .expect("retrieve");
        assert_eq!(result.passages()[0].label, "SL 23:1");
    }

    #[tokio::test]
    async fn test_from_config_semantic_missing_index() {
        let file = corpus_file();
        let config = Config {
            corpus_location: file.path().to_string_lossy().into_owned(),
            index_path: Some("/definitely/not/index.rkyv".into()),
            backend: Backend::Semantic,
            ..Default::default()
        };

        let engine = RetrievalEngine::from_config(&config).await;

        let err = engine.retrieve("pastor", 3).await.expect_err("unavailable");
        assert!(matches!(err, RetrievalError::IndexUnavailable { .. }));
    }
}
