use std::io::Write;

use fedchipper::{
    pipeline::{PreprocessOptions, PreprocessPipeline},
    rayon::ParallelRayonPreprocessor,
    records::{ClientData, TransformingClientData},
};
use serde::Serialize;

use crate::{
    input_output::{InputArgs, OutputArgs},
    logging::LogArgs,
    secret_args::SecretArgs,
    vocab_args::VocabArgs,
};

/// One output row; a single batch of a single client.
#[derive(Serialize)]
struct BatchRow<'a> {
    client_id: &'a str,
    input: Vec<Vec<u32>>,
    target: Vec<Vec<u32>>,
}

/// Args for the preprocess command.
#[derive(clap::Args, Debug)]
pub struct PreprocessArgs {
    #[clap(flatten)]
    pub logging: LogArgs,

    #[command(flatten)]
    vocab: VocabArgs,

    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    secrets: SecretArgs,

    /// The max rows per batch.
    #[arg(long, default_value_t = 16)]
    client_batch_size: i64,

    /// The number of times each client's data is repeated.
    #[arg(long, default_value_t = 1)]
    client_epochs_per_round: i64,

    /// Sentence truncation / batch padding length.
    #[arg(long, default_value_t = 20)]
    max_sequence_length: i64,

    /// The max records taken per client; -1 keeps all.
    #[arg(long, default_value_t = 1000, allow_negative_numbers = true)]
    max_elements_per_client: i64,

    /// The number of oov buckets.
    #[arg(long, default_value_t = 1)]
    num_oov_buckets: i64,

    /// The shuffle buffer cap.
    #[arg(long, default_value_t = 10_000)]
    max_shuffle_buffer_size: i64,

    /// Pin the shuffle seed.
    #[arg(long, default_value = None)]
    shuffle_seed: Option<u64>,

    /// Size of the rayon thread pool; defaults to the number of cpus.
    #[arg(long, default_value = None)]
    threads: Option<usize>,
}

impl PreprocessArgs {
    fn options(&self) -> PreprocessOptions {
        PreprocessOptions::default()
            .with_client_batch_size(self.client_batch_size)
            .with_client_epochs_per_round(self.client_epochs_per_round)
            .with_max_sequence_length(self.max_sequence_length)
            .with_max_elements_per_client(self.max_elements_per_client)
            .with_num_oov_buckets(self.num_oov_buckets)
            .with_max_shuffle_buffer_size(self.max_shuffle_buffer_size)
            .with_shuffle_seed(self.shuffle_seed)
    }

    /// Run the preprocess command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(3)?;

        if let Some(threads) = self.threads {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()?;
        }

        let words = self.vocab.load_words()?;
        let pipeline = PreprocessPipeline::<u32>::from_words(words, &self.options())?;
        log::info!("Pipeline: {:?}", pipeline.config());

        let data = self.input.load_client_data()?;
        let transform = self.secrets.build_transform(data.client_ids())?;
        let data = TransformingClientData::new(data, transform);

        log::info!("Preprocessing {} clients...", data.num_clients());
        let results = ParallelRayonPreprocessor::new(pipeline).preprocess_all(&data)?;

        let mut writer = self.output.open_writer()?;
        let mut num_batches = 0;
        for client in &results {
            for batch in &client.batches {
                let row = BatchRow {
                    client_id: &client.client_id,
                    input: batch.input.to_nested_vec(),
                    target: batch.target.to_nested_vec(),
                };
                serde_json::to_writer(&mut writer, &row)?;
                writeln!(writer)?;
                num_batches += 1;
            }
        }
        writer.flush()?;

        log::info!("Wrote {num_batches} batches");
        Ok(())
    }
}
