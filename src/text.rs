//! Word frequencies for the review word cloud

use std::collections::{HashMap, HashSet};

pub const DEFAULT_MAX_WORDS: usize = 200;

/// Common English words left out of the cloud
const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "don", "down", "during", "each",
    "else", "ever", "few", "for", "from", "further", "get", "had", "has", "have", "having", "he",
    "her", "here", "hers", "herself", "him", "himself", "his", "how", "however", "i", "if", "in",
    "into", "is", "it", "its", "itself", "just", "like", "me", "more", "most", "my", "myself",
    "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other", "otherwise",
    "ought", "our", "ours", "ourselves", "out", "over", "own", "same", "shall", "she", "should",
    "since", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves",
];

/// A word and how often it occurs in the corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// Count the words of `corpus` for the cloud.
///
/// Tokens are lowercase alphanumeric runs (apostrophes dropped); stop words
/// and single characters are skipped. Result is sorted by count descending,
/// then alphabetically, and capped at `max_words`.
pub fn word_frequencies(corpus: &str, max_words: usize) -> Vec<WordCount> {
    let stop_words: HashSet<&str> = ENGLISH_STOP_WORDS.iter().copied().collect();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for token in corpus
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|raw| raw.replace('\'', "").to_lowercase())
    {
        if token.chars().count() < 2 || stop_words.contains(token.as_str()) {
            continue;
        }
        *counts.entry(token).or_insert(0) += 1;
    }

    let mut words: Vec<WordCount> = counts
        .into_iter()
        .map(|(word, count)| WordCount { word, count })
        .collect();
    words.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    words.truncate(max_words);
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_order() {
        let corpus = "Great cable, great price. The cable is GREAT and fast";
        let words = word_frequencies(corpus, DEFAULT_MAX_WORDS);

        assert_eq!(
            words[0],
            WordCount {
                word: "great".to_string(),
                count: 3
            }
        );
        assert_eq!(words[1].word, "cable");
        assert_eq!(words[1].count, 2);
        assert!(words.iter().all(|w| w.word != "the" && w.word != "is"));
    }

    #[test]
    fn test_cap_and_short_tokens() {
        let words = word_frequencies("a b c delta echo foxtrot it's", 2);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].word, "delta");
        assert_eq!(words[1].word, "echo");
    }

    #[test]
    fn test_empty_corpus() {
        assert!(word_frequencies("", DEFAULT_MAX_WORDS).is_empty());
    }
}
