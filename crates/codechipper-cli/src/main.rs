mod commands;
mod input_output;
mod logging;
mod lookup_args;

use clap::Parser;
use commands::Commands;

/// cchipper: ICD coding lookups and batching.
#[derive(clap::Parser, Debug)]
pub struct Args {
    /// Subcommand to run.
    #[clap(subcommand)]
    pub command: Commands,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    args.command.run()
}
