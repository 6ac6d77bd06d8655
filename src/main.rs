//! # FAQ Harness CLI (`faqbot`)
//!
//! The `faqbot` binary is the primary interface for FAQ Harness. It
//! provides commands for running the chat API server, serving the static
//! frontend, and asking one-shot questions from the terminal.
//!
//! ## Usage
//!
//! ```bash
//! faqbot --config ./config/faqbot.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `faqbot serve api` | Build the corpus and start the chat API server |
//! | `faqbot serve frontend` | Serve static frontend assets with CORS |
//! | `faqbot ask "<query>"` | Run the pipeline once and print the reply |

mod ask;
mod chat;
mod config;
mod corpus;
mod embedding;
mod frontend;
mod models;
mod prompt;
mod server;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

/// FAQ Harness CLI — a retrieval-augmented FAQ chatbot service.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/faqbot.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "faqbot",
    about = "FAQ Harness — a retrieval-augmented FAQ chatbot service backed by Ollama",
    version,
    long_about = "FAQ Harness loads a question/answer dataset, embeds it through Ollama, \
    and serves a chat API that answers queries from the best-matching entries. A second \
    serve mode hosts the static frontend with permissive CORS headers."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/faqbot.toml`. Dataset, model, retrieval, and
    /// server settings are read from this file.
    #[arg(long, global = true, default_value = "./config/faqbot.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Start one of the HTTP servers.
    Serve {
        #[command(subcommand)]
        service: ServeService,
    },

    /// Ask a single question from the terminal.
    ///
    /// Builds the corpus, retrieves the best-matching chunks for the query,
    /// and prints the chat model's reply.
    Ask {
        /// The question to ask.
        query: String,

        /// Override the number of chunks to retrieve.
        #[arg(long)]
        top_n: Option<usize>,
    },
}

/// Server subcommands.
#[derive(Subcommand)]
enum ServeService {
    /// Start the chat API server.
    ///
    /// Builds the corpus from the configured dataset (fatal on any
    /// embedding failure), then binds to `[server].bind` and serves
    /// `GET /` and `GET /chat`.
    Api,

    /// Serve static frontend files.
    ///
    /// Binds to `[frontend].bind` and serves everything under
    /// `[frontend].root` with permissive CORS headers.
    Frontend,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Serve { service } => match service {
            ServeService::Api => {
                let corpus = corpus::build_corpus(&cfg).await?;
                server::run_server(Arc::new(cfg), Arc::new(corpus)).await?;
            }
            ServeService::Frontend => {
                frontend::run_frontend(&cfg).await?;
            }
        },
        Commands::Ask { query, top_n } => {
            ask::run_ask(&cfg, &query, top_n).await?;
        }
    }

    Ok(())
}
