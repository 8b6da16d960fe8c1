use fedchipper::vocab::{load_word_counts_path, top_vocab_words};

/// Vocabulary source arg group.
#[derive(clap::Args, Debug)]
pub struct VocabArgs {
    /// Word counts file; one "word<TAB>count" per line, most frequent first.
    #[arg(long)]
    pub vocab: String,

    /// The number of most frequent words to keep.
    #[arg(long, default_value_t = 10_000)]
    pub vocab_size: usize,
}

impl VocabArgs {
    /// Load the top `vocab_size` words.
    pub fn load_words(&self) -> Result<Vec<String>, Box<dyn std::error::Error>> {
        let counts = load_word_counts_path(&self.vocab)?;
        Ok(top_vocab_words(&counts, self.vocab_size)?)
    }
}
