//! Code normalization and the cheap "does this look like code" filter.

use once_cell::sync::Lazy;
use regex::Regex;

const KEYWORDS: &[&str] = &[
    "function", "const", "let", "var", "class", "def", "import", "export", "return", "if",
    "else", "for", "while", "try", "catch", "async", "await", "usestate", "useeffect",
    "usecallback", "usememo", "useref", "usecontext", "component", "props", "state", "render",
    "jsx", "tsx",
];

const SYMBOLS: &[&str] = &[
    "=>", "===", "!==", "!=", "==", "&&", "||", "++", "--", "+=", "-=", "*=", "/=", "??", "?.",
    "...", "${", "</>", "</", "/>", "::", "->", "<-",
];

const EXTENSIONS: &[&str] = &[
    ".js", ".jsx", ".ts", ".tsx", ".py", ".java", ".cpp", ".c", ".css", ".html", ".json", ".xml",
    ".yaml", ".yml", ".md",
];

static STRUCTURAL: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?s)\w+\s*\(.*?\)",    // call
        r"(?s)\w+\s*=\s*\w+",    // assignment
        r"(?s)\{\s*\w+.*?\}",    // object literal
        r"(?s)\[\s*\w+.*?\]",    // array literal
        r"(?s)<\w+.*?/?>",       // tag
        r"(?s)\w+\.\w+\(",       // method call
        r"(?s)//.*|/\*.*?\*/",   // comment
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Lowercase, then drop whitespace, quotes, semicolons and commas.
///
/// Lossy on purpose: two snippets that differ only in formatting normalize
/// to the same string.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '"' | '\'' | ';' | ','))
        .collect()
}

/// True when `text` contains a keyword, a code symbol, a file extension or a
/// code-shaped construct. Keywords and extensions match case-insensitively.
pub fn has_code_indicators(text: &str) -> bool {
    let lower = text.to_lowercase();
    KEYWORDS.iter().any(|k| lower.contains(k))
        || SYMBOLS.iter().any(|s| text.contains(s))
        || EXTENSIONS.iter().any(|e| lower.contains(e))
        || STRUCTURAL.iter().any(|re| re.is_match(text))
}
