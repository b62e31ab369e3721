//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(name = "coverwise")]
#[command(about = "Match health insurance plans and answer questions from regulatory documents")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: info level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file (default: config.toml, then config.example.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Recommend plans for an age, state and target coverage
    Recommend {
        /// Age of the insured person
        #[arg(long)]
        age: u32,
        /// Two-letter state code (e.g. TX)
        #[arg(long)]
        state: String,
        /// Desired coverage amount in dollars
        #[arg(long)]
        coverage: f64,
        /// Plan type filter (HMO, PPO, EPO, POS or Any)
        #[arg(long, default_value = "Any")]
        plan_type: String,
        /// Coverage tolerance in percent (default from config)
        #[arg(long)]
        tolerance: Option<f64>,
        /// Maximum number of plans to show (default from config)
        #[arg(long)]
        top: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Ask a free-text question about insurance rules
    Ask {
        /// The question
        query: String,
    },
    /// Semantic search over the regulatory documents
    Search {
        /// Search query
        query: String,
        /// Number of documents to return (default from config)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate the embedding matrix for the document corpus
    Index {
        /// Documents embedded per request
        #[arg(long, default_value = "32")]
        batch_size: usize,
    },
    /// Show loaded data statistics
    Info,
    /// Show current configuration
    Config,
}
