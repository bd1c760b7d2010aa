//! Word frequency counting on top of any [`Map`] backing

use std::{
    fmt,
    io::{BufRead, Write},
    time::{Duration, Instant},
};

use crate::{Backing, Map, config::HashMapConfig, error::Result};

/// Counts word occurrences in a map whose backing is picked at runtime.
///
/// The counter only talks to the [`Map`] contract, so every backing produces the same counts.
pub struct WordCounter {
    /// Word to number of occurrences
    counts: Box<dyn Map<String, usize>>,
    /// Which backing `counts` uses
    backing: Backing,
    /// Words seen by the last `read_words`
    total: usize,
}

impl fmt::Debug for WordCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WordCounter")
            .field("backing", &self.backing)
            .field("total", &self.total)
            .field("unique", &self.counts.len())
            .finish()
    }
}

impl WordCounter {
    /// Creates a counter with default backing settings
    #[must_use]
    pub fn new(backing: Backing) -> Self {
        Self {
            counts: backing.build(),
            backing,
            total: 0,
        }
    }

    /// Creates a counter whose hash backing is sized by `config`.
    ///
    /// # Errors
    ///
    /// Fails when `config` does not validate.
    pub fn with_config(backing: Backing, config: HashMapConfig) -> Result<Self> {
        Ok(Self {
            counts: backing.build_with_config(config)?,
            backing,
            total: 0,
        })
    }

    /// The backing in use
    #[must_use]
    pub const fn backing(&self) -> Backing {
        self.backing
    }

    /// Splits every line on runs of whitespace and remembers how many words were read.
    ///
    /// # Errors
    ///
    /// Propagates read failures, including invalid UTF-8.
    pub fn read_words(&mut self, reader: impl BufRead) -> Result<Vec<String>> {
        let mut words = Vec::new();
        for line in reader.lines() {
            words.extend(line?.split_whitespace().map(str::to_owned));
        }
        self.total = words.len();
        tracing::debug!(words = self.total, "read words");
        Ok(words)
    }

    /// Counts every word into the map and returns how long that took
    pub fn build_map(&mut self, words: &[String]) -> Duration {
        let start = Instant::now();
        for word in words {
            let count = if self.counts.contains_key(word) {
                self.counts.get(word).copied().unwrap_or(0).saturating_add(1)
            } else {
                1
            };
            self.counts.put(word.clone(), count);
        }
        start.elapsed()
    }

    /// Number of words read by the last `read_words`
    #[must_use]
    pub const fn total_word_count(&self) -> usize {
        self.total
    }

    /// Number of distinct words counted
    #[must_use]
    pub fn unique_word_count(&self) -> usize {
        self.counts.len()
    }

    /// Occurrences of `word`, zero if it was never seen
    #[must_use]
    pub fn count(&self, word: &str) -> usize {
        self.counts.get(&word.to_owned()).copied().unwrap_or(0)
    }

    /// Share of all words that are `word`; zero when nothing was read
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn frequency(&self, word: &str) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(word) as f64 / self.total as f64
    }

    /// Forgets every count and the total
    pub fn clear(&mut self) {
        self.counts.clear();
        self.total = 0;
    }

    /// Worst-case lookup depth of the backing map
    #[must_use]
    pub fn max_probe_depth(&self) -> usize {
        self.counts.max_probe_depth()
    }

    /// Writes the total on the first line, then one `word - count` line per distinct word in the
    /// backing's export order.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn write_word_count(&self, mut writer: impl Write) -> Result<()> {
        writeln!(writer, "{}", self.total)?;
        for entry in self.counts.entries() {
            writeln!(writer, "{} - {}", entry.key(), entry.value())?;
        }
        writer.flush()?;
        Ok(())
    }

    /// The `k` most frequent words, most frequent first; equal counts sort by word
    #[must_use]
    pub fn top_words(&self, k: usize) -> Vec<(String, usize)> {
        let mut ranked: Vec<(String, usize)> = self
            .counts
            .entries()
            .into_iter()
            .map(crate::Entry::into_pair)
            .collect();
        ranked.sort_unstable_by(|(a_word, a_count), (b_word, b_count)| {
            b_count.cmp(a_count).then_with(|| a_word.cmp(b_word))
        });
        ranked.truncate(k);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "the cat and the hat\n  sat on   the mat\n\nand the end\n";

    fn counted(backing: Backing) -> WordCounter {
        let mut counter = WordCounter::new(backing);
        let words = counter.read_words(TEXT.as_bytes()).unwrap();
        counter.build_map(&words);
        counter
    }

    #[test]
    fn test_read_words_skips_blank_runs() {
        let mut counter = WordCounter::new(Backing::Linear);
        let words = counter.read_words(TEXT.as_bytes()).unwrap();
        assert_eq!(words.len(), 12);
        assert_eq!(words.first().map(String::as_str), Some("the"));
        assert!(words.iter().all(|word| !word.is_empty()));
        assert_eq!(counter.total_word_count(), 12);
    }

    #[test]
    fn test_counts_agree_across_backings() {
        for backing in Backing::ALL {
            let counter = counted(backing);
            assert_eq!(counter.backing(), backing);
            assert_eq!(counter.unique_word_count(), 8);
            assert_eq!(counter.count("the"), 4);
            assert_eq!(counter.count("and"), 2);
            assert_eq!(counter.count("dog"), 0);
            assert!((counter.frequency("the") - 4.0 / 12.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_top_words_breaks_ties_by_word() {
        let counter = counted(Backing::Hash);
        let top = counter.top_words(3);
        assert_eq!(
            top,
            vec![
                ("the".to_string(), 4),
                ("and".to_string(), 2),
                ("cat".to_string(), 1)
            ]
        );
        assert_eq!(counter.top_words(100).len(), 8);
    }

    #[test]
    fn test_write_word_count_in_tree_order() {
        let counter = counted(Backing::Tree);
        let mut out = Vec::new();
        counter.write_word_count(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("12"));
        assert_eq!(lines.next(), Some("and - 2"));
        assert_eq!(lines.next(), Some("cat - 1"));
        assert_eq!(lines.count(), 6);
    }

    #[test]
    fn test_clear_resets_counts() {
        let mut counter = counted(Backing::Tree);
        assert!(counter.max_probe_depth() > 0);
        counter.clear();
        assert_eq!(counter.total_word_count(), 0);
        assert_eq!(counter.unique_word_count(), 0);
        assert!(counter.frequency("the").abs() < f64::EPSILON);
    }

    #[test]
    fn test_with_config_sizes_hash_backing() {
        let config = HashMapConfig::new().with_initial_capacity(2);
        let mut counter = WordCounter::with_config(Backing::Hash, config).unwrap();
        let words = counter.read_words("a b c d e f".as_bytes()).unwrap();
        counter.build_map(&words);
        assert_eq!(counter.unique_word_count(), 6);
        let invalid = config.with_max_load_factor(0.0);
        assert!(WordCounter::with_config(Backing::Tree, invalid).is_err());
    }
}
