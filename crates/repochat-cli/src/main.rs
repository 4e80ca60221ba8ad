use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod app;

#[derive(Parser)]
#[command(name = "repochat")]
#[command(about = "Chat with your codebase through a local indexing backend")]
#[command(version)]
struct Cli {
    /// Workspace root to watch and index (defaults to the current directory)
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Override the backend base URL
    #[arg(long)]
    backend_url: Option<String>,

    /// Ask a single question and exit
    #[arg(short, long)]
    question: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut settings = repochat_core::Settings::load();
    if let Some(url) = cli.backend_url {
        settings.backend.base_url = url;
    }

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    let root = root.canonicalize()?;

    if let Some(question) = cli.question {
        app::run_single_question(&settings, &root, &question).await
    } else {
        app::run(settings, root).await
    }
}
