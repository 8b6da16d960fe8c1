use std::io::Write;

use fedchipper::secrets::make_random_secrets;

use crate::{input_output::OutputArgs, logging::LogArgs, vocab_args::VocabArgs};

/// Args for the random-secrets command.
#[derive(clap::Args, Debug)]
pub struct RandomSecretsArgs {
    #[clap(flatten)]
    pub logging: LogArgs,

    #[command(flatten)]
    vocab: VocabArgs,

    #[command(flatten)]
    output: OutputArgs,

    /// The number of secrets to generate.
    #[arg(long)]
    num_secrets: usize,

    /// The number of words per secret.
    #[arg(long)]
    secret_len: usize,

    /// Generator seed.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

impl RandomSecretsArgs {
    /// Run the random-secrets command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(2)?;

        let words = self.vocab.load_words()?;
        let secrets = make_random_secrets(&words, self.num_secrets, self.secret_len, self.seed)?;

        let mut writer = self.output.open_writer()?;
        for secret in &secrets {
            writeln!(writer, "{secret}")?;
        }
        writer.flush()?;

        Ok(())
    }
}
