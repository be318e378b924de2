//! CLI surface for the drover binary.

use clap::Parser;

/// Send a message through the agent runner and print the final result.
#[derive(Parser, Debug)]
#[command(name = "drover", version, about = "Drover agent runner CLI")]
pub struct Cli {
    /// The message to send
    pub message: String,

    /// System prompt for the agent
    #[arg(long)]
    pub system: Option<String>,

    /// Maximum number of turns before the loop stops
    #[arg(long, default_value_t = 5)]
    pub max_turns: u32,

    /// Print per-turn trace records
    #[arg(long)]
    pub trace: bool,

    /// Model override (defaults to OPENAI_MODEL or gpt-4o)
    #[arg(long)]
    pub model: Option<String>,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
