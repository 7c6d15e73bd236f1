//! Fingerprints: truncated content hashes plus the word and identifier
//! tokenizers shared by index building and lookup.

use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

/// Hex length of a line fingerprint.
pub const LINE_HASH_LEN: usize = 12;
/// Hex length of a word-sequence fingerprint.
pub const SEQUENCE_HASH_LEN: usize = 10;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("valid regex"));
static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[a-zA-Z_][a-zA-Z0-9_]{3,}\b").expect("valid regex"));

const LITERALS: &[&str] = &["true", "false", "null", "undefined"];

/// First `len` hex digits of the SHA-256 of `text`.
pub fn truncated_hash(text: &str, len: usize) -> String {
    let mut hex = format!("{:x}", Sha256::digest(text.as_bytes()));
    hex.truncate(len);
    hex
}

/// Fingerprint of an already-trimmed line.
pub fn line_hash(line: &str) -> String {
    truncated_hash(line, LINE_HASH_LEN)
}

/// Fingerprint of a space-joined word window.
pub fn sequence_hash(words: &[&str]) -> String {
    truncated_hash(&words.join(" "), SEQUENCE_HASH_LEN)
}

/// Lowercased word tokens in order.
pub fn words(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD.find_iter(&lower).map(|m| m.as_str().to_string()).collect()
}

/// Distinct lowercased identifiers of four or more characters, minus
/// boolean/null literals.
pub fn identifiers(text: &str) -> BTreeSet<String> {
    IDENTIFIER
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|id| !LITERALS.contains(&id.as_str()))
        .collect()
}

/// A 3-word window counts only if its joined form is longer than 8 characters.
pub fn is_meaningful_triple(words: &[&str]) -> bool {
    words.iter().map(|w| w.chars().count()).sum::<usize>() + words.len().saturating_sub(1) > 8
}
