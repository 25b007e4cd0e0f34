//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser, Debug)]
#[command(name = "docbot")]
#[command(about = "Ask questions about your PDF, DOCX and TXT documents")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: info level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the configuration file (default: config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Defaults to `chat` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Interactive question/answer loop over the ingested documents
    Chat,
    /// Answer a single question and exit
    Ask {
        /// The question to ask
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
        /// Also print the chunks the answer was based on
        #[arg(long)]
        sources: bool,
    },
    /// Load, split and embed documents into the vector store
    Ingest {
        /// Directory to scan (default: documents.path from config)
        #[arg(short, long)]
        path: Option<PathBuf>,
        /// Maximum chunk length in characters
        #[arg(long)]
        chunk_size: Option<usize>,
        /// Characters shared between neighbouring chunks
        #[arg(long)]
        chunk_overlap: Option<usize>,
    },
    /// Start the HTTP API server
    Serve {
        /// Host to bind (default: server.host from config)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (default: server.port from config)
        #[arg(short, long)]
        port: Option<u16>,
        /// Enable permissive CORS
        #[arg(long)]
        cors: bool,
    },
    /// Initialize the vector store schema and collection
    Init {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Drop the configured collection and its chunks
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
        /// Drop every collection and the tables themselves, e.g. after changing the embedding dimension
        #[arg(long)]
        all: bool,
    },
    /// Show current configuration and collection status
    Config,
}

impl Cli {
    pub fn command_or_default(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Chat)
    }
}
