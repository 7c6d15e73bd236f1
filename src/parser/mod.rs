//! Parser module: lexical, regex-driven extraction.
//!
//! No compiler front-ends: a file's language is picked from its extension and
//! the matching pattern profile is run over the raw text.

pub mod extractor;
pub mod language;
pub mod patterns;

pub use extractor::{extract_file, FileExtractions};
pub use language::Language;
pub use patterns::{profile_for, LanguageProfile};
