//! Lectio command-line entrypoint.
//!
//! `lectio <query...>` prints the grounding context for a query.
//! `lectio --build-index <out>` embeds the corpus and writes a binary vector index.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, anyhow};
use mimalloc::MiMalloc;
use tracing_subscriber::EnvFilter;

use lectio::{Config, HttpEmbedder, QueryEmbedder, RetrievalEngine, StubEmbedder, VectorIndex};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const USAGE: &str = "usage: lectio <query...>\n       lectio --build-index <out>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        None | Some("-h" | "--help") => {
            println!("{USAGE}");
            Ok(())
        }
        Some("--build-index") => {
            let out = args.get(1).map(PathBuf::from).ok_or_else(|| anyhow!(USAGE))?;
            let config = Config::from_env()?;
            config.validate_sources()?;
            build_index(&config, &out).await
        }
        Some(_) => {
            let config = Config::from_env()?;
            config.validate()?;
            run_query(&config, &args.join(" ")).await
        }
    }
}

async fn run_query(config: &Config, query: &str) -> anyhow::Result<()> {
    tracing::info!(
        backend = %config.backend,
        corpus = %config.corpus_location,
        limit = config.limit,
        "Lectio starting"
    );

    let engine = RetrievalEngine::from_config(config).await;
    let context = engine.context(query, config.limit).await?;

    println!("{context}");
    Ok(())
}

async fn build_index(config: &Config, out: &Path) -> anyhow::Result<()> {
    let corpus = config.corpus_source().load().await?;

    let embedder: Box<dyn QueryEmbedder> = match config.http_embedder_config() {
        Some(http) => Box::new(HttpEmbedder::new(http)?),
        None => {
            tracing::warn!("No LECTIO_EMBEDDER_URL configured, building index with stub embedder");
            Box::new(StubEmbedder::default())
        }
    };

    let index = VectorIndex::build(&corpus, embedder.as_ref()).await?;
    index
        .save(out)
        .with_context(|| format!("failed to write index to {}", out.display()))?;

    println!("wrote {} entries to {}", index.len(), out.display());
    Ok(())
}
