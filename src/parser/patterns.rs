//! Pattern library: per-language import/export/declaration regexes.
//!
//! Each pattern has exactly one capture group; the captured text is what gets
//! recorded. Languages without a profile share the empty profile.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use super::language::Language;

/// Ordered pattern lists for one language.
#[derive(Debug, Default)]
pub struct LanguageProfile {
    pub imports: Vec<Regex>,
    pub exports: Vec<Regex>,
    pub variables: Vec<Regex>,
}

impl LanguageProfile {
    fn new(imports: &[&str], exports: &[&str], variables: &[&str]) -> Self {
        Self {
            imports: compile(imports),
            exports: compile(exports),
            variables: compile(variables),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty() && self.exports.is_empty() && self.variables.is_empty()
    }
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).unwrap_or_else(|e| panic!("bad built-in pattern {p}: {e}")))
        .collect()
}

const JS_IMPORT_FROM: &str =
    r#"import\s+(?:(?:\*\s+as\s+\w+)|(?:\{[^}]+\})|(?:\w+))\s+from\s+['"]([^'"\n]+)['"]"#;
const JS_DYNAMIC_IMPORT: &str = r#"import\s*\(\s*['"]([^'"\n]+)['"]"#;
const JS_REQUIRE: &str = r#"require\s*\(\s*['"]([^'"\n]+)['"]"#;
const JS_REEXPORT: &str = r#"export\s+(?:\*|\{\s*[^}]*\s*\})\s+from\s+['"]([^'"\n]+)['"]"#;
const EXPORT_LIST: &str = r"export\s+\{\s*([^}]+)\s*\}";
const C_INCLUDE: &str = r#"#include\s*[<"]([^>"]+)[>"]"#;
const C_DEFINE: &str = r"#define\s+(\w+)";
const PY_TOP_LEVEL_DEF: &str = r"(?m)^(?:def|class)\s+(\w+)";
const PY_TOP_LEVEL_ASSIGN: &str = r"(?m)^(\w+)\s*=";

static PROFILES: Lazy<HashMap<Language, LanguageProfile>> = Lazy::new(|| {
    let mut profiles = HashMap::new();

    profiles.insert(
        Language::JavaScript,
        LanguageProfile::new(
            &[JS_IMPORT_FROM, JS_DYNAMIC_IMPORT, JS_REQUIRE, JS_REEXPORT],
            &[
                r"export\s+(?:default\s+)?(?:class|function|const|let|var)\s+(\w+)",
                EXPORT_LIST,
                r"module\.exports\s*=\s*(\w+)",
                r"exports\.(\w+)\s*=",
            ],
            &[r"(?:const|let|var)\s+(\w+)", r"function\s+(\w+)", r"class\s+(\w+)"],
        ),
    );

    profiles.insert(
        Language::TypeScript,
        LanguageProfile::new(
            &[
                JS_IMPORT_FROM,
                r#"import\s+type\s+(?:\{[^}]+\}|\w+)\s+from\s+['"]([^'"\n]+)['"]"#,
                JS_DYNAMIC_IMPORT,
                JS_REEXPORT,
            ],
            &[
                r"export\s+(?:default\s+)?(?:class|function|const|let|var|interface|type|enum)\s+(\w+)",
                EXPORT_LIST,
            ],
            &[
                r"(?:const|let|var)\s+(\w+)",
                r"function\s+(\w+)",
                r"class\s+(\w+)",
                r"interface\s+(\w+)",
                r"type\s+(\w+)",
                r"enum\s+(\w+)",
            ],
        ),
    );

    profiles.insert(
        Language::Python,
        LanguageProfile::new(
            &[r"from\s+(\S+)\s+import", r"import\s+(\S+)"],
            &[PY_TOP_LEVEL_DEF, PY_TOP_LEVEL_ASSIGN],
            &[PY_TOP_LEVEL_DEF, PY_TOP_LEVEL_ASSIGN],
        ),
    );

    profiles.insert(
        Language::Java,
        LanguageProfile::new(
            &[r"import\s+(?:static\s+)?([a-zA-Z0-9_.]+);"],
            &[r"public\s+(?:class|interface|enum)\s+(\w+)"],
            &[
                r"(?:public|private|protected|static|final)*\s*(?:class|interface|enum)\s+(\w+)",
                r"(?:public|private|protected|static|final)*\s*\w+\s+(\w+)\s*[=;(]",
            ],
        ),
    );

    profiles.insert(
        Language::C,
        LanguageProfile::new(
            &[C_INCLUDE],
            &[],
            &[r"(?:int|char|float|double|void|struct|enum|typedef)\s+(\w+)", C_DEFINE],
        ),
    );

    profiles.insert(
        Language::Cpp,
        LanguageProfile::new(
            &[C_INCLUDE, r"using\s+namespace\s+(\w+);"],
            &[],
            &[
                r"(?:class|struct|namespace)\s+(\w+)",
                r"(?:int|char|float|double|void|bool|auto)\s+(\w+)",
                C_DEFINE,
            ],
        ),
    );

    profiles.insert(
        Language::Go,
        LanguageProfile::new(
            &[r#"import\s+"([^"]+)""#, r#"import\s+\(\s*"([^"]+)""#],
            &[
                r"func\s+([A-Z]\w*)",
                r"type\s+([A-Z]\w*)",
                r"var\s+([A-Z]\w*)",
                r"const\s+([A-Z]\w*)",
            ],
            &[r"func\s+(\w+)", r"type\s+(\w+)", r"var\s+(\w+)", r"const\s+(\w+)"],
        ),
    );

    profiles.insert(
        Language::Rust,
        LanguageProfile::new(
            &[r"use\s+([a-zA-Z0-9_:]+)", r"extern\s+crate\s+(\w+)"],
            &[r"pub\s+(?:fn|struct|enum|trait|type|const|static)\s+(\w+)"],
            &[r"(?:fn|struct|enum|trait|type|const|static|let|mut)\s+(\w+)"],
        ),
    );

    profiles.insert(
        Language::CSharp,
        LanguageProfile::new(
            &[r"using\s+([a-zA-Z0-9_.]+);"],
            &[r"public\s+(?:class|interface|struct|enum)\s+(\w+)"],
            &[
                r"(?:public|private|protected|internal|static)*\s*(?:class|interface|struct|enum)\s+(\w+)",
                r"(?:public|private|protected|internal|static)*\s*\w+\s+(\w+)\s*[=;{]",
            ],
        ),
    );

    profiles.insert(
        Language::Ruby,
        LanguageProfile::new(
            &[
                r#"require\s+['"]([^'"\n]+)['"]"#,
                r#"require_relative\s+['"]([^'"\n]+)['"]"#,
                r#"load\s+['"]([^'"\n]+)['"]"#,
            ],
            &[r"class\s+(\w+)", r"module\s+(\w+)", r"def\s+(\w+)"],
            &[r"def\s+(\w+)", r"class\s+(\w+)", r"module\s+(\w+)", r"(\w+)\s*="],
        ),
    );

    profiles.insert(
        Language::Php,
        LanguageProfile::new(
            &[
                r#"require(?:_once)?\s*\(?['"]([^'"\n]+)['"]"#,
                r#"include(?:_once)?\s*\(?['"]([^'"\n]+)['"]"#,
                r"use\s+([a-zA-Z0-9_\\]+);",
            ],
            &[
                r"class\s+(\w+)",
                r"function\s+(\w+)",
                r"interface\s+(\w+)",
                r"trait\s+(\w+)",
            ],
            &[r"function\s+(\w+)", r"class\s+(\w+)", r"\$(\w+)\s*="],
        ),
    );

    profiles
});

static EMPTY_PROFILE: Lazy<LanguageProfile> = Lazy::new(LanguageProfile::default);

/// Pattern profile for a language; languages without patterns get the empty profile.
pub fn profile_for(language: Language) -> &'static LanguageProfile {
    PROFILES.get(&language).unwrap_or(&EMPTY_PROFILE)
}
