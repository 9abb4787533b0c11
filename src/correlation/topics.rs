//! Topic extraction and source attribution for a single item.

use std::collections::BTreeSet;

use crate::item::metadata::{KEY_SOURCE, KEY_TAGS, KEY_TOPICS};
use crate::item::{MetadataExt, SynthesizedItem};

const MIN_WORD_CHARS: usize = 3;

const STOP_WORDS: &[&str] = &[
    "about", "after", "all", "also", "and", "any", "are", "based", "been", "but", "can", "for",
    "from", "has", "have", "how", "into", "its", "just", "more", "new", "not", "now", "one",
    "our", "out", "over", "than", "that", "the", "their", "them", "then", "there", "these",
    "they", "this", "use", "used", "using", "via", "was", "what", "when", "which", "who", "why",
    "will", "with", "you", "your",
];

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Lower-cased significant words: at least three characters and not a stop word.
pub fn significant_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= MIN_WORD_CHARS)
        .map(str::to_lowercase)
        .filter(|w| !is_stop_word(w))
}

/// Deduplicated topics for one item: explicit topics/tags, title words, key-feature words.
pub fn extract_topics(item: &SynthesizedItem) -> BTreeSet<String> {
    let meta = item.metadata();
    let mut topics: BTreeSet<String> = meta
        .get_strings(KEY_TOPICS)
        .into_iter()
        .chain(meta.get_strings(KEY_TAGS))
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();

    topics.extend(significant_words(item.title()));
    for feature in &item.synthesis.key_features {
        topics.extend(significant_words(feature));
    }
    topics
}

/// Explicit `source` metadata, else the default source for the item's kind.
pub fn source_of(item: &SynthesizedItem) -> String {
    item.metadata()
        .get_str(KEY_SOURCE)
        .map(str::to_lowercase)
        .unwrap_or_else(|| item.kind().default_source().to_string())
}
