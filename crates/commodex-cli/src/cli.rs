//! Command-line argument definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Extract structured commodity-strategy data from documents.
#[derive(Parser)]
#[command(name = "commodex", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert a document and extract the structured record as JSON.
    Extract(ExtractArgs),

    /// Convert a document to text and show its token estimate.
    Preview(PreviewArgs),
}

#[derive(Args)]
pub struct ExtractArgs {
    /// Path to the document (.pdf, .pptx, .ppt).
    pub file: PathBuf,

    /// Completion endpoint URL.
    #[arg(long, env = "COMMODEX_API_URL")]
    pub api_url: String,

    /// Bearer token for the endpoint.
    #[arg(long, env = "COMMODEX_API_TOKEN", hide_env_values = true)]
    pub api_token: String,

    /// Use the chat-message payload shape instead of the single-prompt shape.
    #[arg(long)]
    pub chat: bool,

    /// Model name to send with chat payloads.
    #[arg(long, env = "COMMODEX_MODEL")]
    pub model: Option<String>,

    /// Write the JSON artifact here instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Override the chunk token budget.
    #[arg(long)]
    pub token_budget: Option<usize>,

    /// Override the request timeout (seconds).
    #[arg(long)]
    pub timeout: Option<u64>,
}

#[derive(Args)]
pub struct PreviewArgs {
    /// Path to the document (.pdf, .pptx, .ppt).
    pub file: PathBuf,
}
