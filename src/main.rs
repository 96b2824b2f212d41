use std::process::ExitCode;

use clap::{Parser, Subcommand};

use amdat::utils::print_entries;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a data file and print its entries
    Check {
        path: String,
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match &cli.command {
        Commands::Check { path, verbose } => match amdat::load_data(path) {
            Ok(entries) => {
                print_entries(&entries, *verbose);
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("error: {err}");
                ExitCode::FAILURE
            }
        },
    }
}
