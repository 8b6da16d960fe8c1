//! # Word Count IO
//!
//! Frequency-ranked vocabulary sources are tab-separated text:
//! ```text
//! the	1027
//! to	933
//! ```
//! Lines are kept in source order; that order defines the dense token ids.

use std::{
    fs::File,
    io::{BufRead, BufReader, Write},
    path::Path,
};

use crate::errors::{FCResult, FedchipperError, invalid_option};

/// A frequency-ranked `(word, count)` list.
pub type WordCounts = Vec<(String, u64)>;

/// Load a [`WordCounts`] table from a file.
///
/// # Arguments
/// * `path` - the path to the word count file.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(path)))]
pub fn load_word_counts_path<P: AsRef<Path>>(path: P) -> FCResult<WordCounts> {
    let path = path.as_ref();
    log::info!("Loading word counts: {}", path.display());
    read_word_counts(BufReader::new(File::open(path)?))
}

/// Read a [`WordCounts`] table from a [`BufRead`] stream.
///
/// Blank lines are skipped.
pub fn read_word_counts<R: BufRead>(reader: R) -> FCResult<WordCounts> {
    let mut counts = WordCounts::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            continue;
        }

        let (word, count) = line.rsplit_once('\t').ok_or_else(|| {
            FedchipperError::Parse(format!("line {}: expected `word<TAB>count`", idx + 1))
        })?;
        let count = count.trim().parse::<u64>().map_err(|e| {
            FedchipperError::Parse(format!("line {}: bad count {count:?}: {e}", idx + 1))
        })?;

        counts.push((word.to_string(), count));
    }
    Ok(counts)
}

/// Write a [`WordCounts`] table to a [`Write`] writer.
pub fn write_word_counts<W: Write>(
    counts: &[(String, u64)],
    writer: &mut W,
) -> FCResult<()> {
    for (word, count) in counts {
        writeln!(writer, "{word}\t{count}")?;
    }
    Ok(())
}

/// Select the `vocab_size` most frequent words, in source order.
pub fn top_vocab_words(
    counts: &[(String, u64)],
    vocab_size: usize,
) -> FCResult<Vec<String>> {
    if vocab_size == 0 {
        return invalid_option("vocab_size", "a positive integer", 0);
    }
    Ok(counts
        .iter()
        .take(vocab_size)
        .map(|(word, _)| word.clone())
        .collect())
}

#[cfg(test)]
mod tests {
    use std::io::{BufWriter, Cursor};

    use super::*;

    #[test]
    fn test_read_word_counts() {
        let data = "the\t10\nto\t7\n\nof\t3\r\n";
        let counts = read_word_counts(Cursor::new(data)).unwrap();
        assert_eq!(
            counts,
            vec![
                ("the".to_string(), 10),
                ("to".to_string(), 7),
                ("of".to_string(), 3),
            ]
        );

        assert_eq!(
            top_vocab_words(&counts, 2).unwrap(),
            vec!["the".to_string(), "to".to_string()]
        );
        assert!(top_vocab_words(&counts, 0).is_err());
    }

    #[test]
    fn test_read_word_counts_errors() {
        assert!(matches!(
            read_word_counts(Cursor::new("the 10\n")),
            Err(FedchipperError::Parse(_))
        ));
        assert!(matches!(
            read_word_counts(Cursor::new("the\tmany\n")),
            Err(FedchipperError::Parse(_))
        ));
    }

    #[test]
    fn test_save_load_word_counts() {
        let counts: WordCounts = vec![("apple".to_string(), 30), ("pear".to_string(), 2)];

        tempdir::TempDir::new("word_counts_test")
            .and_then(|dir| {
                let path = dir.path().join("counts.tsv");

                {
                    let mut writer = BufWriter::new(File::create(&path)?);
                    write_word_counts(&counts, &mut writer).expect("Failed to save counts");
                }

                let loaded = load_word_counts_path(&path).expect("Failed to load counts");
                assert_eq!(loaded, counts);

                Ok(())
            })
            .unwrap();
    }
}
