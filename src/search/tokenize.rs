//! Text tokenization and stemming for ranked search.
//!
//! Documentation fragments mix prose with qualified symbol names such as
//! `DeepEquilibriumNetworks.SkipDeepEquilibriumNetwork` and keyword arguments such as
//! `jacobian_regularization`, so words are split on punctuation, underscores and
//! CamelCase boundaries while the joined compound is kept as its own token.

use rust_stemmers::Stemmer;
use xxhash_rust::xxh3::xxh3_64;

/// Common English stop words dropped from indexing and queries.
pub(crate) const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "in", "is", "it",
    "its", "of", "on", "or", "that", "the", "this", "to", "was", "were", "will", "with",
];

/// Splits text into lowercased, stemmed terms.
pub(crate) fn tokenize_and_stem(text: &str, stemmer: &Stemmer) -> Vec<String> {
    let mut tokens = vec![];

    for word in text.split(|c: char| !(c.is_alphanumeric() || c == '_')) {
        let parts = split_compound(word);
        match parts.as_slice() {
            [] => {}
            [single] => push_token(single, &mut tokens, stemmer),
            parts => {
                let joined: String = parts.concat();
                push_token(&joined, &mut tokens, stemmer);
                for part in parts {
                    push_token(part, &mut tokens, stemmer);
                }
            }
        }
    }

    tokens
}

/// Splits a word on underscores and case boundaries.
///
/// `SkipDEQSolver` → `Skip`, `DEQ`, `Solver`; `sensealg_v2` → `sensealg`, `v2`.
fn split_compound(word: &str) -> Vec<&str> {
    let mut parts = vec![];

    for segment in word.split('_').filter(|s| !s.is_empty()) {
        let chars: Vec<(usize, char)> = segment.char_indices().collect();
        let mut start = 0;

        for (n, &(i, c)) in chars.iter().enumerate().skip(1) {
            let prev = chars[n - 1].1;
            let next = chars.get(n + 1).map(|&(_, c)| c);

            // lower/digit → Upper, or the last capital of an acronym before a lowercase run
            let boundary = c.is_uppercase()
                && (prev.is_lowercase()
                    || prev.is_numeric()
                    || (prev.is_uppercase() && next.is_some_and(char::is_lowercase)));

            if boundary {
                parts.push(&segment[start..i]);
                start = i;
            }
        }

        parts.push(&segment[start..]);
    }

    parts
}

fn push_token(token: &str, tokens: &mut Vec<String>, stemmer: &Stemmer) {
    let lowercase = token.to_lowercase();
    if STOP_WORDS.contains(&lowercase.as_str()) {
        return;
    }
    tokens.push(stemmer.stem(&lowercase).into_owned());
}

/// Hashes a term for lookup. Stable across processes so cached indexes stay valid.
pub(crate) fn hash_term(term: &str) -> u64 {
    xxh3_64(term.to_lowercase().as_bytes())
}
