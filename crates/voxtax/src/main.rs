mod cli;
mod config;
mod ingest;
mod inspect;
mod logging;
mod model;
mod organize;
mod run;

use anyhow::Result;
use clap::Parser;
use voxtax_core::BatchOptions;

use crate::cli::{Cli, Command};
use crate::config::OrganizeJob;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbose = if cli.verbose {
        true
    } else {
        logging::env_flag()
    };
    logging::init(verbose);
    match cli.command {
        Command::Organize {
            source,
            characters,
            topics,
            output,
            pattern,
            taxonomy,
            dictionary,
            suffixes,
            report,
            exclude_pings,
            exclude_nonverbal,
        } => organize::run(OrganizeJob {
            source,
            characters,
            topics,
            output,
            pattern,
            taxonomy,
            dictionary,
            known_suffixes: suffixes,
            report,
            options: BatchOptions {
                exclude_pings,
                exclude_nonverbal,
            },
        }),
        Command::Classify {
            stems,
            characters,
            topics,
            taxonomy,
        } => inspect::classify(stems, characters, topics, taxonomy),
        Command::Suffixes { dictionary, min } => inspect::suffixes(dictionary, min),
        Command::Run { config } => run::run_from_config(&config),
    }
}
