//! Language classification by file extension.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Language tag derived from a file extension.
///
/// `Unknown` is the "default" language: it has an empty pattern profile, so
/// files classified this way become isolated graph nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    TypeScript,
    Python,
    Java,
    Kotlin,
    Scala,
    C,
    Cpp,
    ObjC,
    CSharp,
    FSharp,
    VbNet,
    Go,
    Rust,
    Ruby,
    Php,
    Swift,
    Perl,
    Lua,
    R,
    Shell,
    Html,
    Css,
    Scss,
    Sass,
    Less,
    Xml,
    Json,
    Yaml,
    Toml,
    Ini,
    Sql,
    Assembly,
    Dart,
    Elm,
    Elixir,
    Erlang,
    Haskell,
    Julia,
    Nim,
    Pascal,
    Prolog,
    Tcl,
    Verilog,
    Vhdl,
    #[default]
    #[serde(rename = "default")]
    Unknown,
}

impl Language {
    /// Classify a path by its (case-insensitive) extension.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| Self::from_extension(&e.to_ascii_lowercase()))
            .unwrap_or(Language::Unknown)
    }

    /// Classify a lowercase extension without the leading dot.
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "js" | "jsx" | "mjs" | "cjs" => Language::JavaScript,
            "ts" | "tsx" => Language::TypeScript,
            "py" | "pyw" | "pyx" | "pyi" => Language::Python,
            "java" => Language::Java,
            "kt" | "kts" => Language::Kotlin,
            "scala" => Language::Scala,
            "c" | "h" => Language::C,
            "cpp" | "cc" | "cxx" | "hpp" | "hxx" => Language::Cpp,
            "m" | "mm" => Language::ObjC,
            "cs" => Language::CSharp,
            "fs" | "fsx" => Language::FSharp,
            "vb" => Language::VbNet,
            "go" => Language::Go,
            "rs" => Language::Rust,
            "rb" | "rake" => Language::Ruby,
            "php" | "phtml" => Language::Php,
            "swift" => Language::Swift,
            "pl" | "pm" => Language::Perl,
            "lua" => Language::Lua,
            "r" => Language::R,
            "sh" | "bash" | "zsh" | "fish" => Language::Shell,
            "html" | "htm" => Language::Html,
            "css" => Language::Css,
            "scss" => Language::Scss,
            "sass" => Language::Sass,
            "less" => Language::Less,
            "xml" => Language::Xml,
            "json" => Language::Json,
            "yaml" | "yml" => Language::Yaml,
            "toml" => Language::Toml,
            "ini" | "cfg" => Language::Ini,
            "sql" => Language::Sql,
            "asm" | "s" => Language::Assembly,
            "dart" => Language::Dart,
            "elm" => Language::Elm,
            "ex" | "exs" => Language::Elixir,
            "erl" | "hrl" => Language::Erlang,
            "hs" | "lhs" => Language::Haskell,
            "jl" => Language::Julia,
            "nim" => Language::Nim,
            "pas" | "pp" => Language::Pascal,
            "pro" => Language::Prolog,
            "tcl" => Language::Tcl,
            "v" => Language::Verilog,
            "vhd" | "vhdl" => Language::Vhdl,
            _ => Language::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Python => "python",
            Language::Java => "java",
            Language::Kotlin => "kotlin",
            Language::Scala => "scala",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::ObjC => "objc",
            Language::CSharp => "csharp",
            Language::FSharp => "fsharp",
            Language::VbNet => "vbnet",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Ruby => "ruby",
            Language::Php => "php",
            Language::Swift => "swift",
            Language::Perl => "perl",
            Language::Lua => "lua",
            Language::R => "r",
            Language::Shell => "shell",
            Language::Html => "html",
            Language::Css => "css",
            Language::Scss => "scss",
            Language::Sass => "sass",
            Language::Less => "less",
            Language::Xml => "xml",
            Language::Json => "json",
            Language::Yaml => "yaml",
            Language::Toml => "toml",
            Language::Ini => "ini",
            Language::Sql => "sql",
            Language::Assembly => "assembly",
            Language::Dart => "dart",
            Language::Elm => "elm",
            Language::Elixir => "elixir",
            Language::Erlang => "erlang",
            Language::Haskell => "haskell",
            Language::Julia => "julia",
            Language::Nim => "nim",
            Language::Pascal => "pascal",
            Language::Prolog => "prolog",
            Language::Tcl => "tcl",
            Language::Verilog => "verilog",
            Language::Vhdl => "vhdl",
            Language::Unknown => "default",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
