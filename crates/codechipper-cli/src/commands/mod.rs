mod batches;
mod lookups;

/// Subcommands for cchipper
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Build the lookups and print a JSON summary.
    Lookups(lookups::LookupsArgs),

    /// Walk a labeled split in padded batches.
    Batches(batches::BatchesArgs),
}

impl Commands {
    /// Run the subcommand.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Commands::Lookups(cmd) => cmd.run(),
            Commands::Batches(cmd) => cmd.run(),
        }
    }
}
