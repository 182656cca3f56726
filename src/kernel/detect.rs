//! 按内容猜测语言
//!
//! 每种语言一组正则，命中数即得分；得分最高者胜出，平分时按 `DETECTION_PRIORITY` 取靠前者。
//! 没有任何命中返回 `None`，调用方保留原语言。

use super::language::LanguageId;
use regex::Regex;
use std::sync::OnceLock;

/// 平分时的优先顺序，越靠前越优先
pub const DETECTION_PRIORITY: &[LanguageId] = &[
    LanguageId::Php,
    LanguageId::Html,
    LanguageId::Python,
    LanguageId::TypeScript,
    LanguageId::JavaScript,
    LanguageId::Css,
    LanguageId::Java,
    LanguageId::CSharp,
    LanguageId::Cpp,
    LanguageId::C,
    LanguageId::Go,
    LanguageId::Rust,
    LanguageId::Ruby,
    LanguageId::Swift,
    LanguageId::Kotlin,
    LanguageId::Sql,
    LanguageId::Json,
    LanguageId::Yaml,
    LanguageId::Xml,
    LanguageId::Markdown,
];

const PATTERNS: &[(LanguageId, &[&str])] = &[
    (
        LanguageId::Php,
        &[
            r"<\?php",
            r"\$[a-zA-Z_]\w*\s*=",
            r"\becho\s",
            r"\$\w+->\w+",
            r"\bfunction\s+\w+\s*\(\s*\$",
        ],
    ),
    (
        LanguageId::Html,
        &[
            r"(?i)<!DOCTYPE\s+html",
            r"(?i)<html[\s>]",
            r"(?i)<(div|span|body|head|p|a|ul|li|h[1-6])[\s>]",
            r"</\w+>",
        ],
    ),
    (
        LanguageId::Python,
        &[
            r"(?m)^\s*def\s+\w+\s*\(.*\)\s*:",
            r"(?m)^\s*import\s+\w+\s*$",
            r"(?m)^\s*from\s+[\w.]+\s+import\s",
            r"\bprint\s*\(",
            r"(?m)^\s*(if|elif|for|while)\s.*:\s*$",
            r"\bself\.",
            r"\b(None|True|False)\b",
        ],
    ),
    (
        LanguageId::TypeScript,
        &[
            r":\s*(string|number|boolean|any|void)\b",
            r"\binterface\s+\w+\s*\{",
            r"\btype\s+\w+\s*=",
            r"\b(public|private|protected)\s+\w+\s*:",
        ],
    ),
    (
        LanguageId::JavaScript,
        &[
            r"\b(const|let|var)\s+\w+\s*=",
            r"\bfunction\s+\w+\s*\(",
            r"=>",
            r"\bconsole\.\w+\s*\(",
            r"\bdocument\.\w+",
            r"\brequire\s*\(",
        ],
    ),
    (
        LanguageId::Css,
        &[
            r"(?m)^\s*[.#]?[\w-]+(\s*[,>+~]?\s*[.#]?[\w-]+)*\s*\{\s*$",
            r"(?m)^\s*[\w-]+\s*:\s*[^;]+;\s*$",
            r"@media\s",
            r"\b\d+(px|em|rem|vh|vw)\b",
        ],
    ),
    (
        LanguageId::Java,
        &[
            r"\bpublic\s+class\s+\w+",
            r"\bpublic\s+static\s+void\s+main",
            r"\bSystem\.out\.print",
            r"\bimport\s+java\.",
        ],
    ),
    (
        LanguageId::CSharp,
        &[
            r"\busing\s+System\b",
            r"\bnamespace\s+\w+",
            r"\bConsole\.Write(Line)?\s*\(",
            r"\bstatic\s+void\s+Main\s*\(",
        ],
    ),
    (
        LanguageId::Cpp,
        &[
            r"#include\s*<(iostream|vector|string|map)>",
            r"\bstd::",
            r"\bcout\s*<<",
            r"\busing\s+namespace\s+std\b",
        ],
    ),
    (
        LanguageId::C,
        &[
            r"#include\s*<(stdio|stdlib|string)\.h>",
            r"\bprintf\s*\(",
            r"\bint\s+main\s*\(",
            r"\bscanf\s*\(",
        ],
    ),
    (
        LanguageId::Go,
        &[
            r"(?m)^\s*package\s+\w+",
            r"\bfunc\s+\w*\s*\(",
            r"\bfmt\.\w+\(",
            r":=",
        ],
    ),
    (
        LanguageId::Rust,
        &[
            r"\bfn\s+\w+\s*\(",
            r"\blet\s+mut\s",
            r"\bprintln!\s*\(",
            r"\buse\s+std::",
            r"\bimpl\b",
        ],
    ),
    (
        LanguageId::Ruby,
        &[
            r"(?m)^\s*def\s+\w+[^:]*$",
            r"(?m)^\s*end\s*$",
            r"\bputs\s",
            r"\.each\s+do\b",
            r"\battr_accessor\b",
        ],
    ),
    (
        LanguageId::Swift,
        &[
            r"\bfunc\s+\w+\s*\([^)]*\)\s*->",
            r"\bimport\s+(UIKit|Foundation|SwiftUI)\b",
            r"\bvar\s+\w+\s*:\s*\w+",
            r"\bguard\s+let\b",
        ],
    ),
    (
        LanguageId::Kotlin,
        &[
            r"\bfun\s+\w+\s*\(",
            r"\bval\s+\w+",
            r"\bprintln\s*\(",
            r"\bdata\s+class\b",
        ],
    ),
    (
        LanguageId::Sql,
        &[
            r"(?i)\bSELECT\b.+\bFROM\b",
            r"(?i)\bINSERT\s+INTO\b",
            r"(?i)\bCREATE\s+TABLE\b",
            r"(?i)\bUPDATE\s+\w+\s+SET\b",
            r"(?i)\bWHERE\b",
        ],
    ),
    (
        LanguageId::Json,
        &[
            r"\A\s*[\{\[]",
            r#""[\w-]+"\s*:\s*"#,
            r"[\}\]]\s*\z",
        ],
    ),
    (
        LanguageId::Yaml,
        &[
            r"(?m)^\s*[\w-]+:\s+[^\{\};]+$",
            r"(?m)^\s*-\s+\w+",
            r"(?m)^---\s*$",
        ],
    ),
    (
        LanguageId::Xml,
        &[
            r"<\?xml\s",
            r#"(?m)^\s*<[\w:]+(\s+[\w:]+="[^"]*")*\s*/?>"#,
            r"</[\w:]+>",
        ],
    ),
    (
        LanguageId::Markdown,
        &[
            r"(?m)^#{1,6}\s+\S",
            r"(?m)^\s*[-*]\s+\S",
            r"\[[^\]]+\]\([^)]+\)",
            r"```",
        ],
    ),
];

struct CompiledPatterns {
    language: LanguageId,
    patterns: Vec<Regex>,
}

fn compiled() -> &'static [CompiledPatterns] {
    static TABLE: OnceLock<Vec<CompiledPatterns>> = OnceLock::new();
    TABLE.get_or_init(|| {
        PATTERNS
            .iter()
            .map(|(language, sources)| CompiledPatterns {
                language: *language,
                patterns: sources
                    .iter()
                    .filter_map(|src| match Regex::new(src) {
                        Ok(re) => Some(re),
                        Err(e) => {
                            tracing::warn!(pattern = %src, error = %e, "invalid detection pattern");
                            None
                        }
                    })
                    .collect(),
            })
            .collect()
    })
}

/// 某种语言的命中数
pub fn score(text: &str, language: LanguageId) -> usize {
    compiled()
        .iter()
        .find(|c| c.language == language)
        .map(|c| c.patterns.iter().filter(|re| re.is_match(text)).count())
        .unwrap_or(0)
}

pub fn detect_language(text: &str) -> Option<LanguageId> {
    if text.trim().is_empty() {
        return None;
    }

    let mut best: Option<(LanguageId, usize)> = None;
    for &language in DETECTION_PRIORITY {
        let s = score(text, language);
        if s == 0 {
            continue;
        }
        // 严格大于才替换，平分保留优先级更高者
        if best.map_or(true, |(_, best_score)| s > best_score) {
            best = Some((language, s));
        }
    }

    best.map(|(language, _)| language)
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/detect.rs"]
mod tests;
