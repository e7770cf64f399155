use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use localrag_cli::repl;
use localrag_cli::server::{self, AppState};
use localrag_cli::wiring::build_service;
use localrag_core::config::Settings;

#[derive(Parser)]
#[command(name = "localrag", about = "Ask questions about a local folder of documents", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rebuild the index from every PDF, text and Markdown file in a folder
    Ingest {
        /// Documents folder (default: data.documents_dir)
        dir: Option<PathBuf>,
    },
    /// Interactive question loop; type `exit` to quit
    Ask,
    /// Serve /health, /ask and /ingest over HTTP
    Serve {
        /// Bind address (default: server.host:server.port)
        #[arg(long)]
        addr: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load()?;
    let service = build_service(&settings).await?;

    match cli.command {
        Command::Ingest { dir } => {
            let dir = dir.unwrap_or_else(|| settings.documents_dir());
            println!("Ingesting from {}", dir.display());
            let report = service.ingest_all(&dir).await?;
            println!("✅ Indexed {} chunks from {} document(s)", report.chunk_count, report.document_count);
        }
        Command::Ask => repl::run(&service, tokio::io::BufReader::new(tokio::io::stdin())).await?,
        Command::Serve { addr } => {
            let addr = addr.unwrap_or_else(|| settings.server_addr());
            let state = AppState { service: Arc::new(service), documents_dir: settings.documents_dir() };
            server::serve(state, &addr).await?;
        }
    }
    Ok(())
}
