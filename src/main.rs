//! Command line interface of the fair deployment experiments.

use clap::Command;
use std::process;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::analyze::{get_analyze_app, run_analyze};
use commands::compare::{get_compare_app, run_compare};
use commands::consistency::{get_consistency_app, run_consistency};
use commands::generate::{get_generate_app, run_generate};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("u-deploy")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Fair emergency vehicle deployment experiments")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(get_generate_app())
        .subcommand(get_analyze_app())
        .subcommand(get_compare_app())
        .subcommand(get_consistency_app())
        .get_matches();

    let result = match matches.subcommand() {
        Some(("generate", sub)) => run_generate(sub),
        Some(("analyze", sub)) => run_analyze(sub),
        Some(("compare", sub)) => run_compare(sub),
        Some(("consistency", sub)) => run_consistency(sub),
        _ => Err("no subcommand was used, use -h to print help information".to_string()),
    };

    if let Err(err) = result {
        eprintln!("{err}");
        process::exit(1);
    }
}
