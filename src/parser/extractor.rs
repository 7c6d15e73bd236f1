//! Lexical extraction of imports, exports and declarations.
//!
//! No AST: every pattern in the file's language profile is applied to the whole
//! text and all captures are unioned, then deduplicated per category.

use regex::Regex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::language::Language;
use super::patterns::profile_for;

/// Everything pulled out of one file's text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileExtractions {
    pub file_path: PathBuf,
    pub language: Language,
    /// Raw import strings, deduplicated and sorted.
    pub imports: Vec<String>,
    pub exports: Vec<String>,
    pub variables: Vec<String>,
}

/// Extract imports, exports and variables from a file's text.
///
/// Unknown languages yield empty lists (the file still becomes a graph node).
pub fn extract_file(path: &Path, source: &str) -> FileExtractions {
    let language = Language::from_path(path);
    let profile = profile_for(language);

    FileExtractions {
        file_path: path.to_path_buf(),
        language,
        imports: collect_matches(&profile.imports, source),
        exports: collect_matches(&profile.exports, source),
        variables: collect_matches(&profile.variables, source),
    }
}

fn collect_matches(patterns: &[Regex], source: &str) -> Vec<String> {
    let mut found = BTreeSet::new();
    for pattern in patterns {
        for caps in pattern.captures_iter(source) {
            if let Some(m) = caps.get(1) {
                found.insert(m.as_str().to_string());
            }
        }
    }
    found.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_python() {
        let source = r#"
import os
from utils.helpers import load
import b

class Service:
    pass

def run():
    return 1

LIMIT = 10
"#;
        let ex = extract_file(&PathBuf::from("a.py"), source);
        assert_eq!(ex.language, Language::Python);
        assert!(ex.imports.contains(&"os".to_string()));
        assert!(ex.imports.contains(&"utils.helpers".to_string()));
        assert!(ex.imports.contains(&"b".to_string()));
        assert!(ex.exports.contains(&"Service".to_string()));
        assert!(ex.exports.contains(&"run".to_string()));
        assert!(ex.exports.contains(&"LIMIT".to_string()));
    }

    #[test]
    fn test_duplicates_collapse() {
        let source = "import x from './x';\nimport x from './x';\nconst a = require('./x');\n";
        let ex = extract_file(&PathBuf::from("main.js"), source);
        assert_eq!(ex.imports, vec!["./x".to_string()]);
    }

    #[test]
    fn test_typescript_declarations() {
        let source = r#"
import type { User } from './models';
export interface Props { id: number }
export enum Role { Admin }
type Alias = string;
"#;
        let ex = extract_file(&PathBuf::from("view.ts"), source);
        assert_eq!(ex.imports, vec!["./models".to_string()]);
        assert!(ex.exports.contains(&"Props".to_string()));
        assert!(ex.exports.contains(&"Role".to_string()));
        assert!(ex.variables.contains(&"Alias".to_string()));
    }

    #[test]
    fn test_rust_use_and_pub_items() {
        let source = "use crate::graph::engine;\nextern crate serde;\npub fn build() {}\nfn private() {}\n";
        let ex = extract_file(&PathBuf::from("lib.rs"), source);
        assert!(ex.imports.contains(&"crate::graph::engine".to_string()));
        assert!(ex.imports.contains(&"serde".to_string()));
        assert_eq!(ex.exports, vec!["build".to_string()]);
        assert!(ex.variables.contains(&"private".to_string()));
    }

    #[test]
    fn test_unknown_language_extracts_nothing() {
        let ex = extract_file(&PathBuf::from("notes.md"), "import everything from 'nowhere'");
        assert_eq!(ex.language, Language::Unknown);
        assert!(ex.imports.is_empty());
        assert!(ex.exports.is_empty());
        assert!(ex.variables.is_empty());
    }

    #[test]
    fn test_empty_source() {
        let ex = extract_file(&PathBuf::from("empty.go"), "");
        assert!(ex.imports.is_empty());
        assert!(ex.variables.is_empty());
    }
}
