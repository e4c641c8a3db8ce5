//! flagtree CLI
//!
//! Entry point for the `flagtree` command-line tool.

use clap::{Parser, Subcommand};
use flagtree::EffectiveOptions;
use std::io::Write;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "flagtree")]
#[command(about = "Flatten option documents into dot-path keys and arguments", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct InputArgs {
    /// Option document (.json or .toml); repeat to layer, last wins
    #[arg(long = "input", short = 'i', required = true)]
    inputs: Vec<PathBuf>,

    /// Keep only options under this component prefix (and its -archive sibling)
    #[arg(long, short = 'p')]
    prefix: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one --key=value argument per line
    Args {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Write the JSON encoding to stdout
    Encode {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Show the effective options with provenance
    Show {
        #[command(flatten)]
        input: InputArgs,

        /// Output in human-readable format instead of JSON
        #[arg(long)]
        human: bool,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flagtree=warn,flagtree_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Args { input } => run_args(input),
        Commands::Encode { input } => run_encode(input),
        Commands::Show { input, human } => run_show(input, human),
    }
}

fn load_effective(input: &InputArgs) -> EffectiveOptions {
    match EffectiveOptions::load(&input.inputs, input.prefix.as_deref()) {
        Ok(effective) => effective,
        Err(e) => {
            eprintln!("Error loading options: {}", e);
            process::exit(1);
        }
    }
}

fn run_args(input: InputArgs) {
    let effective = load_effective(&input);
    for arg in effective.tree.to_args() {
        println!("{}", arg);
    }
}

fn run_encode(input: InputArgs) {
    let effective = load_effective(&input);
    let bytes = match effective.tree.encode() {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error encoding options: {}", e);
            process::exit(1);
        }
    };

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = stdout.write_all(&bytes).and_then(|_| stdout.flush()) {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
}

fn run_show(input: InputArgs, human: bool) {
    let effective = load_effective(&input);
    let report = match effective.report() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error building report: {}", e);
            process::exit(1);
        }
    };

    if human {
        print!("{}", report.to_human());
    } else {
        match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    }
}
