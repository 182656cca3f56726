//! 启发式代码检查
//!
//! 只对 JavaScript 与 PHP 做检查，其余语言返回空列表。
//! 所有检查都不会失败：解析器异常也会转成一条诊断。

use super::language::LanguageId;
use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

impl DiagnosticSeverity {
    pub fn label(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeError {
    /// 从 1 开始
    pub line: usize,
    pub message: String,
    pub severity: DiagnosticSeverity,
}

impl CodeError {
    fn error(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
            severity: DiagnosticSeverity::Error,
        }
    }

    fn warning(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
            severity: DiagnosticSeverity::Warning,
        }
    }
}

pub const MISSING_SEMICOLON: &str = "Titik koma (;) mungkin hilang";
pub const MISSING_PHP_TAG: &str = "Tag pembuka <?php tidak ditemukan";

pub fn undefined_message(name: &str) -> String {
    format!("'{}' mungkin belum didefinisikan", name)
}

/// 结果按行号稳定排序，同一行保持检出顺序
pub fn check(text: &str, language: LanguageId) -> Vec<CodeError> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut errors = match language {
        LanguageId::JavaScript => check_javascript(text),
        LanguageId::Php => check_php(text),
        _ => Vec::new(),
    };
    errors.sort_by_key(|e| e.line);
    errors
}

struct Patterns {
    js_print: Regex,
    js_return: Regex,
    js_assign: Regex,
    php_print: Regex,
    php_assign: Regex,
    ident: Regex,
    decl_simple: Regex,
    decl_destructure: Regex,
    decl_named: Regex,
    decl_function_params: Regex,
    decl_arrow_params: Regex,
    decl_arrow_single: Regex,
    decl_method_params: Regex,
    decl_catch: Regex,
    decl_import: Regex,
}

fn build_patterns() -> Result<Patterns, regex::Error> {
    Ok(Patterns {
        js_print: Regex::new(r"^(console\.\w+|alert|document\.write(ln)?)\s*\(")?,
        js_return: Regex::new(r"^return\b")?,
        js_assign: Regex::new(
            r#"^(?:(?:let|const|var)\s+)?[A-Za-z_$][\w$.\[\]'"]*\s*(?:[+\-*/%]|\*\*|\|\||&&|\?\?)?=(?:[^=>]|$)"#,
        )?,
        php_print: Regex::new(r"^(echo|print)\b")?,
        php_assign: Regex::new(r#"^\$[\w\[\]'"\->]*\s*(?:[.+\-*/%]|\?\?)?=(?:[^=>]|$)"#)?,
        ident: Regex::new(r"[A-Za-z_$][\w$]*")?,
        decl_simple: Regex::new(r"\b(?:let|const|var)\s+([A-Za-z_$][\w$]*)")?,
        decl_destructure: Regex::new(r"\b(?:let|const|var)\s*[\{\[]([^\}\]]*)[\}\]]")?,
        decl_named: Regex::new(r"\b(?:function|class)\s*\*?\s*([A-Za-z_$][\w$]*)")?,
        decl_function_params: Regex::new(r"\bfunction\b[^(]*\(([^)]*)\)")?,
        decl_arrow_params: Regex::new(r"\(([^()]*)\)\s*=>")?,
        decl_arrow_single: Regex::new(r"([A-Za-z_$][\w$]*)\s*=>")?,
        decl_method_params: Regex::new(
            r"(?m)^\s*(?:async\s+|static\s+)*[A-Za-z_$][\w$]*\s*\(([^)]*)\)\s*\{",
        )?,
        decl_catch: Regex::new(r"\bcatch\s*\(\s*([A-Za-z_$][\w$]*)")?,
        decl_import: Regex::new(r"\bimport\s+([^;]*?)\s+from\b")?,
    })
}

/// 编译失败时只记录日志，启发式检查随之跳过
fn patterns() -> Option<&'static Patterns> {
    static PATTERNS: OnceLock<Option<Patterns>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| match build_patterns() {
            Ok(p) => Some(p),
            Err(e) => {
                tracing::error!(error = %e, "invalid diagnostics pattern");
                None
            }
        })
        .as_ref()
}

fn check_javascript(text: &str) -> Vec<CodeError> {
    let mut errors = Vec::new();
    if let Some(error) = syntax_error(text) {
        errors.push(error);
    }
    errors.extend(missing_semicolons_js(text));
    errors.extend(undefined_identifiers(text));
    errors
}

fn check_php(text: &str) -> Vec<CodeError> {
    let mut errors = Vec::new();
    if let Some(error) = missing_php_tag(text) {
        errors.push(error);
    }
    errors.extend(missing_semicolons_php(text));
    errors
}

fn syntax_error(text: &str) -> Option<CodeError> {
    let mut parser = tree_sitter::Parser::new();
    if let Err(e) = parser.set_language(tree_sitter_javascript::language()) {
        return Some(CodeError::error(1, format!("Kesalahan sintaks: {}", e)));
    }
    let Some(tree) = parser.parse(text, None) else {
        return Some(CodeError::error(1, "Kesalahan sintaks: kode tidak dapat diurai"));
    };

    let root = tree.root_node();
    if !root.has_error() {
        return None;
    }

    let Some(node) = first_error_node(root) else {
        return Some(CodeError::error(1, "Kesalahan sintaks: token tidak terduga"));
    };
    let line = node.start_position().row + 1;
    let message = if node.is_missing() {
        format!("Kesalahan sintaks: '{}' hilang", node.kind())
    } else {
        "Kesalahan sintaks: token tidak terduga".to_string()
    };
    Some(CodeError::error(line, message))
}

fn first_error_node(node: tree_sitter::Node<'_>) -> Option<tree_sitter::Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error_node)
}

fn ends_statement(trimmed: &str) -> bool {
    trimmed.ends_with([';', '{', '}', ',', '(', '['])
}

fn is_comment_line(trimmed: &str) -> bool {
    trimmed.starts_with("//")
        || trimmed.starts_with("/*")
        || trimmed.starts_with('*')
        || trimmed.starts_with('#')
}

fn missing_semicolons_js(text: &str) -> Vec<CodeError> {
    let Some(p) = patterns() else {
        return Vec::new();
    };
    text.lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let trimmed = line.trim();
            if trimmed.is_empty()
                || is_comment_line(trimmed)
                || trimmed.contains("//")
                || ends_statement(trimmed)
            {
                return None;
            }
            let relevant = p.js_print.is_match(trimmed)
                || p.js_return.is_match(trimmed)
                || p.js_assign.is_match(trimmed);
            relevant.then(|| CodeError::warning(idx + 1, MISSING_SEMICOLON))
        })
        .collect()
}

fn missing_semicolons_php(text: &str) -> Vec<CodeError> {
    let Some(p) = patterns() else {
        return Vec::new();
    };
    text.lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let trimmed = line.trim();
            if trimmed.is_empty()
                || is_comment_line(trimmed)
                || trimmed.contains("//")
                || trimmed.ends_with("?>")
                || ends_statement(trimmed)
            {
                return None;
            }
            let relevant = p.php_print.is_match(trimmed)
                || p.js_return.is_match(trimmed)
                || p.php_assign.is_match(trimmed);
            relevant.then(|| CodeError::warning(idx + 1, MISSING_SEMICOLON))
        })
        .collect()
}

fn missing_php_tag(text: &str) -> Option<CodeError> {
    let (idx, first) = text
        .lines()
        .enumerate()
        .find(|(_, line)| !line.trim().is_empty())?;
    let trimmed = first.trim();
    if is_comment_line(trimmed) || trimmed.contains("<?php") || trimmed.contains("<?") {
        return None;
    }
    Some(CodeError::error(idx + 1, MISSING_PHP_TAG))
}

const JS_KEYWORDS: &[&str] = &[
    "async", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "export", "extends", "false", "finally", "for", "from",
    "function", "get", "if", "import", "in", "instanceof", "let", "new", "null", "of", "return",
    "set", "static", "super", "switch", "this", "throw", "true", "try", "typeof", "var", "void",
    "while", "with", "yield",
];

const JS_GLOBALS: &[&str] = &[
    "console", "document", "window", "alert", "prompt", "confirm", "Math", "JSON", "Object",
    "Array", "String", "Number", "Boolean", "Date", "Promise", "RegExp", "Symbol", "Map", "Set",
    "WeakMap", "WeakSet", "Error", "TypeError", "parseInt", "parseFloat", "isNaN", "isFinite",
    "setTimeout", "setInterval", "clearTimeout", "clearInterval", "fetch", "require", "module",
    "exports", "localStorage", "sessionStorage", "navigator", "location", "globalThis",
    "process", "Buffer", "undefined", "NaN", "Infinity", "arguments",
];

/// 把字符串字面量与注释替换成等长空白，保留换行与字节偏移
fn blank_strings_and_comments(text: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum Mode {
        Code,
        Str(char),
        LineComment,
        BlockComment,
    }

    let mut out = String::with_capacity(text.len());
    let mut mode = Mode::Code;
    let mut chars = text.chars().peekable();
    let blank = |out: &mut String, ch: char| {
        if ch == '\n' {
            out.push('\n');
        } else {
            out.extend(std::iter::repeat(' ').take(ch.len_utf8()));
        }
    };

    while let Some(ch) = chars.next() {
        match mode {
            Mode::Code => match ch {
                '"' | '\'' | '`' => {
                    mode = Mode::Str(ch);
                    out.push(' ');
                }
                '/' if chars.peek() == Some(&'/') => {
                    mode = Mode::LineComment;
                    out.push(' ');
                }
                '/' if chars.peek() == Some(&'*') => {
                    mode = Mode::BlockComment;
                    out.push(' ');
                }
                _ => out.push(ch),
            },
            Mode::Str(quote) => {
                if ch == '\\' {
                    out.push(' ');
                    if let Some(escaped) = chars.next() {
                        blank(&mut out, escaped);
                    }
                    continue;
                }
                if ch == quote || (ch == '\n' && quote != '`') {
                    mode = Mode::Code;
                }
                blank(&mut out, ch);
            }
            Mode::LineComment => {
                if ch == '\n' {
                    mode = Mode::Code;
                }
                blank(&mut out, ch);
            }
            Mode::BlockComment => {
                if ch == '*' && chars.peek() == Some(&'/') {
                    out.push(' ');
                    chars.next();
                    out.push(' ');
                    mode = Mode::Code;
                    continue;
                }
                blank(&mut out, ch);
            }
        }
    }

    out
}

struct Declaration {
    name: String,
    offset: usize,
    hoisted: bool,
}

fn collect_declarations(p: &Patterns, code: &str) -> Vec<Declaration> {
    let mut decls = Vec::new();

    let mut single = |re: &Regex, hoisted: bool, decls: &mut Vec<Declaration>| {
        for caps in re.captures_iter(code) {
            if let (Some(all), Some(name)) = (caps.get(0), caps.get(1)) {
                decls.push(Declaration {
                    name: name.as_str().to_string(),
                    offset: all.start(),
                    hoisted,
                });
            }
        }
    };
    single(&p.decl_simple, false, &mut decls);
    single(&p.decl_named, true, &mut decls);
    single(&p.decl_arrow_single, false, &mut decls);
    single(&p.decl_catch, false, &mut decls);

    for re in [
        &p.decl_destructure,
        &p.decl_function_params,
        &p.decl_arrow_params,
        &p.decl_method_params,
        &p.decl_import,
    ] {
        for caps in re.captures_iter(code) {
            let (Some(all), Some(list)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            for ident in p.ident.find_iter(list.as_str()) {
                decls.push(Declaration {
                    name: ident.as_str().to_string(),
                    offset: all.start(),
                    hoisted: false,
                });
            }
        }
    }

    decls
}

fn line_of(text: &str, offset: usize) -> usize {
    memchr::memchr_iter(b'\n', &text.as_bytes()[..offset]).count() + 1
}

/// 作为调用目标、独立语句或赋值目标出现、且此前未声明的标识符，每个名字只报告一次
fn undefined_identifiers(text: &str) -> Vec<CodeError> {
    let Some(p) = patterns() else {
        return Vec::new();
    };
    let code = blank_strings_and_comments(text);
    let decls = collect_declarations(p, &code);
    let is_declared = |name: &str, offset: usize| {
        decls
            .iter()
            .any(|d| d.name == name && (d.hoisted || d.offset < offset))
    };

    let mut reported: FxHashSet<&str> = FxHashSet::default();
    let mut errors = Vec::new();

    for m in p.ident.find_iter(&code) {
        let name = m.as_str();
        if JS_KEYWORDS.contains(&name) || JS_GLOBALS.contains(&name) || reported.contains(name) {
            continue;
        }

        let before = &code[..m.start()];
        let prev = before.chars().next_back();
        if prev.is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$') {
            continue;
        }
        if before.trim_end().ends_with('.') {
            continue;
        }

        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let line_end = code[m.end()..]
            .find('\n')
            .map_or(code.len(), |i| m.end() + i);
        let at_line_start = code[line_start..m.start()].trim().is_empty();
        let rest = code[m.end()..line_end].trim();
        let line = code[line_start..line_end].trim();

        if rest.starts_with(':') && !rest.starts_with("::") {
            continue;
        }

        let is_call = rest.starts_with('(');
        let is_bare = at_line_start && (rest.is_empty() || rest == ";");
        let is_assign_target = at_line_start
            && (rest.starts_with("++")
                || rest.starts_with("--")
                || (rest.starts_with('=') && !rest.starts_with("==") && !rest.starts_with("=>")));
        if !(is_call || is_bare || is_assign_target) {
            continue;
        }
        if is_call && at_line_start && line.ends_with('{') {
            continue;
        }
        if is_declared(name, m.start()) {
            continue;
        }

        reported.insert(name);
        errors.push(CodeError::warning(
            line_of(&code, m.start()),
            undefined_message(name),
        ));
    }

    errors
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/diagnostics.rs"]
mod tests;
