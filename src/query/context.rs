//! Context decision engine.
//!
//! Strict priority, never a merge:
//! 1. no active project: no context
//! 2. the user asked for full context: full project context
//! 3. the message matches a file: that file's context
//! 4. otherwise: no context

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::debug;

use super::types::{ContextDecision, SummaryMap};
use crate::config::MatcherConfig;
use crate::matcher::CodeMatcher;
use crate::project::Project;

const HEAVY_RULE: usize = 50;
const LIGHT_RULE: usize = 30;

#[derive(Debug, Clone, Default)]
pub struct ContextEngine {
    matcher: CodeMatcher,
}

impl ContextEngine {
    pub fn new(config: MatcherConfig) -> Self {
        Self {
            matcher: CodeMatcher::new(config),
        }
    }

    pub fn matcher(&self) -> &CodeMatcher {
        &self.matcher
    }

    /// Drop the normalized cache; the next match request rebuilds it.
    pub fn invalidate(&mut self) {
        self.matcher.invalidate();
    }

    pub fn decide(
        &mut self,
        message: &str,
        full_context: bool,
        project: Option<&Project>,
        summaries: &SummaryMap,
    ) -> ContextDecision {
        let Some(project) = project else {
            debug!("no active project, skipping context");
            return ContextDecision::none();
        };

        if full_context {
            return ContextDecision::full_project(full_project_context(project, summaries));
        }

        let matches = self.matcher.find_matching_files(message, Some(project));
        if let Some((path, similarity)) = matches.into_iter().next() {
            debug!(file = %path.display(), similarity, "message matched a project file");
            let truncate = self.matcher.config().truncate_chars;
            let cached = self.matcher.cached(&path).map(|file| file.original.as_str());
            return ContextDecision::specific_file(file_context(&path, similarity, summaries, cached, truncate));
        }

        ContextDecision::none()
    }
}

/// Structure summary plus every available file summary.
pub fn full_project_context(project: &Project, summaries: &SummaryMap) -> String {
    let mut out = String::from("Full Project Context:\n");
    out.push_str(&"=".repeat(HEAVY_RULE));
    out.push_str("\n\n");
    out.push_str(&project.structure_summary());
    out.push_str("\n\n");

    if !summaries.is_empty() {
        out.push_str("File Summaries:\n");
        out.push_str(&"-".repeat(LIGHT_RULE));
        out.push('\n');
        for (path, summary) in summaries {
            let _ = write!(out, "\n{}:\n{}\n", file_name(path), summary);
        }
    }
    out
}

/// Context for one matched file: its summary if known, otherwise its content
/// truncated to `truncate_chars` characters. `cached` is the text already read
/// by the matcher; the file is read from disk only when it is absent.
pub fn file_context(
    path: &Path,
    similarity: f64,
    summaries: &SummaryMap,
    cached: Option<&str>,
    truncate_chars: usize,
) -> String {
    let mut out = format!("Matched File Context (similarity: {similarity:.2}):\n");
    out.push_str(&"=".repeat(HEAVY_RULE));
    out.push_str("\n\n");
    let _ = write!(out, "File: {}\nPath: {}\n", file_name(path), path.display());

    if let Some(summary) = summaries.get(path) {
        let _ = write!(out, "Summary:\n{summary}\n\n");
        return out;
    }

    if let Some(content) = cached {
        let _ = write!(out, "Content:\n{}\n\n", truncate(content, truncate_chars));
        return out;
    }

    match fs::read(path) {
        Ok(bytes) => {
            let content = String::from_utf8_lossy(&bytes);
            let _ = write!(out, "Content:\n{}\n\n", truncate(&content, truncate_chars));
        }
        Err(e) => {
            let _ = write!(out, "Error reading file: {e}\n\n");
        }
    }
    out
}

fn truncate(content: &str, limit: usize) -> String {
    let total = content.chars().count();
    if total <= limit {
        return content.to_string();
    }
    let head: String = content.chars().take(limit).collect();
    format!(
        "{head}\n\n... [File truncated - showing first {limit} characters of {} total]",
        with_thousands(total)
    )
}

fn with_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::types::ContextKind;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn project(files: &[(&str, &str)]) -> (tempfile::TempDir, Project) {
        let dir = tempdir().unwrap();
        let mut paths = Vec::new();
        for (name, body) in files {
            let path = dir.path().join(name);
            fs::write(&path, body).unwrap();
            paths.push(path);
        }
        let project = Project::with_files("demo", dir.path(), paths);
        (dir, project)
    }

    #[test]
    fn test_no_project_no_context() {
        let mut engine = ContextEngine::new(MatcherConfig::default());
        let decision = engine.decide("const x = 1;", true, None, &SummaryMap::new());
        assert_eq!(decision, ContextDecision::none());
    }

    #[test]
    fn test_full_context_wins_over_matching() {
        let (_dir, project) = project(&[("a.js", "const shared = computeSharedValue(input);\n")]);
        let mut summaries = SummaryMap::new();
        summaries.insert(project.files[0].clone(), "Computes the shared value.".into());

        let mut engine = ContextEngine::new(MatcherConfig::default());
        let decision = engine.decide("const shared = computeSharedValue(input);", true, Some(&project), &summaries);
        assert_eq!(decision.kind, ContextKind::FullProject);
        assert!(decision.include);
        assert!(decision.content.starts_with(&format!("Full Project Context:\n{}\n\nProject: demo", "=".repeat(50))));
        assert!(decision.content.contains(&format!("File Summaries:\n{}\n\na.js:\nComputes the shared value.\n", "-".repeat(30))));
        assert!(!decision.content.contains("Matched File Context"));
    }

    #[test]
    fn test_match_gives_file_context() {
        let (_dir, project) = project(&[
            ("cart.js", "function addToCart(item) {\n  cart.items.push(item);\n}\n"),
            ("notes.txt", "nothing relevant here at all\n"),
        ]);
        let mut engine = ContextEngine::new(MatcherConfig::default());
        let decision = engine.decide("addToCart(item) { cart.items.push(item); }", false, Some(&project), &SummaryMap::new());
        assert_eq!(decision.kind, ContextKind::SpecificFile);
        assert!(decision.content.starts_with("Matched File Context (similarity: 0.95):\n"));
        assert!(decision.content.contains("File: cart.js\n"));
        assert!(decision.content.contains("Content:\nfunction addToCart(item)"));
    }

    #[test]
    fn test_match_uses_cached_content() {
        let (_dir, project) = project(&[("cart.js", "function addToCart(item) {\n  cart.items.push(item);\n}\n")]);
        let mut engine = ContextEngine::new(MatcherConfig::default());
        let query = "addToCart(item) { cart.items.push(item); }";
        engine.decide(query, false, Some(&project), &SummaryMap::new());
        assert_eq!(engine.matcher().cached_files(), 1);

        fs::remove_file(&project.files[0]).unwrap();
        let decision = engine.decide(query, false, Some(&project), &SummaryMap::new());
        assert_eq!(decision.kind, ContextKind::SpecificFile);
        assert!(decision.content.contains("Content:\nfunction addToCart(item) {\n  cart.items.push(item);\n}\n"));
        assert!(!decision.content.contains("Error reading file"));
    }

    #[test]
    fn test_file_context_with_cached_text() {
        let text = file_context(Path::new("/gone/util.py"), 0.8, &SummaryMap::new(), Some("def helper():\n    pass\n"), 2000);
        assert!(text.ends_with("Content:\ndef helper():\n    pass\n\n\n"));
    }

    #[test]
    fn test_prose_gives_no_context() {
        let (_dir, project) = project(&[("cart.js", "function addToCart(item) {}\n")]);
        let mut engine = ContextEngine::new(MatcherConfig::default());
        let decision = engine.decide("thanks, that was helpful", false, Some(&project), &SummaryMap::new());
        assert_eq!(decision, ContextDecision::none());
    }

    #[test]
    fn test_file_context_prefers_summary() {
        let path = PathBuf::from("/proj/api.py");
        let mut summaries = SummaryMap::new();
        summaries.insert(path.clone(), "HTTP handlers.".into());
        let text = file_context(&path, 0.456, &summaries, Some("ignored"), 2000);
        assert_eq!(
            text,
            format!(
                "Matched File Context (similarity: 0.46):\n{}\n\nFile: api.py\nPath: /proj/api.py\nSummary:\nHTTP handlers.\n\n",
                "=".repeat(50)
            )
        );
    }

    #[test]
    fn test_file_context_truncates() {
        let (_dir, project) = project(&[("long.py", &"x".repeat(2500))]);
        let text = file_context(&project.files[0], 0.5, &SummaryMap::new(), None, 2000);
        assert!(text.contains("\n\n... [File truncated - showing first 2000 characters of 2,500 total]\n\n"));
    }

    #[test]
    fn test_file_context_unreadable() {
        let text = file_context(Path::new("/definitely/not/here.rs"), 0.3, &SummaryMap::new(), None, 2000);
        assert!(text.contains("File: here.rs\n"));
        assert!(text.contains("Error reading file: "));
    }

    #[test]
    fn test_with_thousands() {
        assert_eq!(with_thousands(0), "0");
        assert_eq!(with_thousands(999), "999");
        assert_eq!(with_thousands(2500), "2,500");
        assert_eq!(with_thousands(1234567), "1,234,567");
    }
}
