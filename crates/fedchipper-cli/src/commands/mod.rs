mod assign_secrets;
mod preprocess;
mod random_secrets;

/// Subcommands for fedchipper-cli
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Preprocess client records into (input, target) batches.
    Preprocess(preprocess::PreprocessArgs),

    /// Assign secrets to clients, and print the assignment.
    AssignSecrets(assign_secrets::AssignSecretsArgs),

    /// Generate random secret phrases from a vocabulary.
    RandomSecrets(random_secrets::RandomSecretsArgs),
}

impl Commands {
    /// Run the subcommand.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Commands::Preprocess(cmd) => cmd.run(),
            Commands::AssignSecrets(cmd) => cmd.run(),
            Commands::RandomSecrets(cmd) => cmd.run(),
        }
    }
}
