use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use leavekb_cli::{
    DEMO_QUERIES, display_banner, format_report, format_snippets, format_stats, print_help,
    read_query,
};
use leavekb_embed::HttpEmbeddingClient;
use leavekb_rag::{
    EmbedderKind, EmbeddingProvider, HashEmbedder, KnowledgeBase, KnowledgeBaseConfig,
    KnowledgeRetriever, LocalVectorIndex, load_records_from_path,
};

const DEMO_TOP_K: usize = 2;

type Kb = KnowledgeBase<dyn EmbeddingProvider, LocalVectorIndex>;

#[derive(Parser)]
#[command(name = "leavekb")]
#[command(about = "Leave-policy knowledge retrieval and reranking", long_about = None)]
struct Cli {
    /// Vector storage directory (overrides LEAVEKB_STORAGE_PATH)
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace the index with the contents of a knowledge JSON file
    Load {
        /// Knowledge file (overrides LEAVEKB_KNOWLEDGE_PATH)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Search the knowledge base
    Search {
        query: String,

        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Restrict results to one category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show document count and collection name
    Stats,
    /// Run the sample questions
    Demo,
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "leavekb=debug,leavekb_rag=debug,leavekb_embed=debug"
    } else {
        "leavekb=info,leavekb_rag=info,leavekb_embed=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_embedder(config: &KnowledgeBaseConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    let embedder: Arc<dyn EmbeddingProvider> = match config.embedder {
        EmbedderKind::Hash => Arc::new(HashEmbedder::new(config.embedding_dimension)?),
        EmbedderKind::Http => Arc::new(HttpEmbeddingClient::from_env()?),
    };
    info!(model = embedder.model_id(), dimension = embedder.dimension(), "Embedder ready");
    Ok(embedder)
}

async fn print_search(kb: &Kb, query: &str, top_k: usize, category: Option<&str>) -> Result<()> {
    let snippets = kb.search(query, top_k, category).await?;
    println!("{}", format_snippets(&snippets));
    Ok(())
}

async fn run_demo(kb: &Kb) -> Result<()> {
    for query in DEMO_QUERIES {
        println!("{} {}", "❓".cyan(), query.bold());
        print_search(kb, query, DEMO_TOP_K, None).await?;
        println!();
    }
    Ok(())
}

async fn run_interactive(kb: &Kb, top_k: usize) -> Result<()> {
    display_banner();

    let mut history = Vec::new();

    while let Some(input) = read_query(&mut history)? {
        if input.is_empty() {
            continue;
        }

        match input.to_lowercase().as_str() {
            "exit" | "quit" => {
                println!("{}", "👋 Goodbye!".green());
                break;
            }
            "help" => print_help(),
            "stats" => println!("{}", format_stats(&kb.stats().await?)),
            _ => {
                // A failed query should not end the session
                if let Err(e) = print_search(kb, &input, top_k, None).await {
                    println!("{} {}", "❌ Search failed:".red(), e);
                }
            }
        }
    }

    debug!(queries = history.len(), "Interactive session ended");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = KnowledgeBaseConfig::from_env()?;
    if let Some(storage) = cli.storage {
        config = config.with_storage_path(storage);
    }

    let embedder = build_embedder(&config)?;
    let kb: Kb = KnowledgeBase::open(&config, embedder)?;

    match cli.command {
        Some(Commands::Load { file }) => {
            let path = file.unwrap_or_else(|| config.knowledge_path.clone());
            let records = load_records_from_path(&path).await?;
            let report = kb.load(records).await?;
            println!("{} {}", "✅".green(), format_report(&report));
        }
        Some(Commands::Search {
            query,
            top_k,
            category,
        }) => {
            let top_k = top_k.unwrap_or(config.default_top_k);
            print_search(&kb, &query, top_k, category.as_deref()).await?;
        }
        Some(Commands::Stats) => {
            println!("{}", format_stats(&kb.stats().await?));
        }
        Some(Commands::Demo) => run_demo(&kb).await?,
        None => run_interactive(&kb, config.default_top_k).await?,
    }

    kb.shutdown().await?;
    Ok(())
}
