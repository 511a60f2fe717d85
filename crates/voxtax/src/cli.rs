use clap::{ArgAction, Parser, Subcommand};

use crate::config::DEFAULT_PATTERN;

#[derive(Parser, Debug)]
#[command(
    name = "voxtax",
    version,
    about = "Sort extracted voice-line files into a speaker/subject/topic taxonomy"
)]
pub struct Cli {
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify every audio file under SOURCE and write the taxonomy tree.
    Organize {
        source: String,
        #[arg(long, env = "VOXTAX_CHARACTERS")]
        characters: String,
        #[arg(long, env = "VOXTAX_TOPICS")]
        topics: String,
        #[arg(long)]
        output: String,
        #[arg(long, default_value = DEFAULT_PATTERN)]
        pattern: String,
        #[arg(long)]
        taxonomy: Option<String>,
        #[arg(long)]
        dictionary: Option<String>,
        /// Dictionary key suffix marking a line entry (repeatable).
        #[arg(long = "suffix")]
        suffixes: Vec<String>,
        #[arg(long)]
        report: Option<String>,
        #[arg(long, default_value_t = false)]
        exclude_pings: bool,
        #[arg(long, default_value_t = false)]
        exclude_nonverbal: bool,
    },
    /// Decode filename stems and print the result as JSON.
    Classify {
        #[arg(required = true)]
        stems: Vec<String>,
        #[arg(long, env = "VOXTAX_CHARACTERS")]
        characters: String,
        #[arg(long, env = "VOXTAX_TOPICS")]
        topics: String,
        #[arg(long)]
        taxonomy: Option<String>,
    },
    /// List frequent key suffixes of a dictionary file.
    Suffixes {
        dictionary: String,
        #[arg(long, default_value_t = 10)]
        min: usize,
    },
    Run {
        #[arg(long, default_value = "voxtax.yaml")]
        config: String,
    },
}
