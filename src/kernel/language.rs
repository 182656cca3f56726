//! 语言表：扩展名查表、规范扩展名与允许打开的扩展名列表
//!
//! 这里只按扩展名判断；按内容猜测语言见 `detect`。

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageId {
    JavaScript,
    TypeScript,
    Python,
    Php,
    Html,
    Css,
    Java,
    Cpp,
    C,
    CSharp,
    Ruby,
    Go,
    Rust,
    Swift,
    Kotlin,
    Sql,
    Xml,
    Json,
    Yaml,
    Markdown,
    PlainText,
}

/// 文件选择器与目录树共用的扩展名白名单
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "js", "jsx", "ts", "tsx", "html", "htm", "css", "scss", "sass", "less", "php", "py", "java",
    "cpp", "c", "h", "cs", "rb", "go", "rs", "swift", "kt", "sql", "xml", "json", "yaml", "yml",
    "md", "txt",
];

impl LanguageId {
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        match ext.as_str() {
            "js" | "jsx" | "mjs" | "cjs" => Some(Self::JavaScript),
            "ts" | "tsx" => Some(Self::TypeScript),
            "py" => Some(Self::Python),
            "php" => Some(Self::Php),
            "html" | "htm" => Some(Self::Html),
            "css" | "scss" | "sass" | "less" => Some(Self::Css),
            "java" => Some(Self::Java),
            "cpp" | "cc" | "cxx" | "hpp" => Some(Self::Cpp),
            "c" | "h" => Some(Self::C),
            "cs" => Some(Self::CSharp),
            "rb" => Some(Self::Ruby),
            "go" => Some(Self::Go),
            "rs" => Some(Self::Rust),
            "swift" => Some(Self::Swift),
            "kt" => Some(Self::Kotlin),
            "sql" => Some(Self::Sql),
            "xml" => Some(Self::Xml),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "md" => Some(Self::Markdown),
            "txt" => Some(Self::PlainText),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        Self::from_extension(path.extension().and_then(|s| s.to_str())?)
    }

    /// 从文件名推断；未知扩展名按纯文本处理
    pub fn from_name(name: &str) -> Self {
        Self::from_path(Path::new(name)).unwrap_or(Self::PlainText)
    }

    pub fn canonical_extension(self) -> &'static str {
        match self {
            Self::JavaScript => "js",
            Self::TypeScript => "ts",
            Self::Python => "py",
            Self::Php => "php",
            Self::Html => "html",
            Self::Css => "css",
            Self::Java => "java",
            Self::Cpp => "cpp",
            Self::C => "c",
            Self::CSharp => "cs",
            Self::Ruby => "rb",
            Self::Go => "go",
            Self::Rust => "rs",
            Self::Swift => "swift",
            Self::Kotlin => "kt",
            Self::Sql => "sql",
            Self::Xml => "xml",
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Markdown => "md",
            Self::PlainText => "txt",
        }
    }

    pub fn language_id(self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Python => "python",
            Self::Php => "php",
            Self::Html => "html",
            Self::Css => "css",
            Self::Java => "java",
            Self::Cpp => "cpp",
            Self::C => "c",
            Self::CSharp => "csharp",
            Self::Ruby => "ruby",
            Self::Go => "go",
            Self::Rust => "rust",
            Self::Swift => "swift",
            Self::Kotlin => "kotlin",
            Self::Sql => "sql",
            Self::Xml => "xml",
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Markdown => "markdown",
            Self::PlainText => "plaintext",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::JavaScript => "JavaScript",
            Self::TypeScript => "TypeScript",
            Self::Python => "Python",
            Self::Php => "PHP",
            Self::Html => "HTML",
            Self::Css => "CSS",
            Self::Java => "Java",
            Self::Cpp => "C++",
            Self::C => "C",
            Self::CSharp => "C#",
            Self::Ruby => "Ruby",
            Self::Go => "Go",
            Self::Rust => "Rust",
            Self::Swift => "Swift",
            Self::Kotlin => "Kotlin",
            Self::Sql => "SQL",
            Self::Xml => "XML",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
            Self::Markdown => "Markdown",
            Self::PlainText => "Plain Text",
        }
    }

    pub fn parse(id: &str) -> Option<Self> {
        let id = id.trim().to_ascii_lowercase();
        match id.as_str() {
            "javascript" | "js" => Some(Self::JavaScript),
            "typescript" | "ts" => Some(Self::TypeScript),
            "python" | "py" => Some(Self::Python),
            "php" => Some(Self::Php),
            "html" => Some(Self::Html),
            "css" => Some(Self::Css),
            "java" => Some(Self::Java),
            "cpp" | "c++" => Some(Self::Cpp),
            "c" => Some(Self::C),
            "csharp" | "c#" | "cs" => Some(Self::CSharp),
            "ruby" | "rb" => Some(Self::Ruby),
            "go" => Some(Self::Go),
            "rust" | "rs" => Some(Self::Rust),
            "swift" => Some(Self::Swift),
            "kotlin" | "kt" => Some(Self::Kotlin),
            "sql" => Some(Self::Sql),
            "xml" => Some(Self::Xml),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "markdown" | "md" => Some(Self::Markdown),
            "plaintext" | "text" | "txt" => Some(Self::PlainText),
            _ => None,
        }
    }
}

pub fn is_allowed_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/language.rs"]
mod tests;
