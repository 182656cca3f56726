//! 当前标签页内的查找与全部替换
//!
//! 区分大小写的字面量查找走 memchr，其余情况交给 regex。

use memchr::memmem;
use regex::{Regex, RegexBuilder};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
    /// 从 1 开始
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub case_sensitive: bool,
    pub use_regex: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            use_regex: false,
        }
    }
}

#[derive(Debug)]
pub enum SearchError {
    EmptyPattern,
    InvalidRegex(regex::Error),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::EmptyPattern => write!(f, "empty search pattern"),
            SearchError::InvalidRegex(e) => write!(f, "invalid regex: {}", e),
        }
    }
}

impl std::error::Error for SearchError {}

impl From<regex::Error> for SearchError {
    fn from(e: regex::Error) -> Self {
        SearchError::InvalidRegex(e)
    }
}

fn build_regex(pattern: &str, options: SearchOptions) -> Result<Regex, SearchError> {
    let source = if options.use_regex {
        pattern.to_string()
    } else {
        regex::escape(pattern)
    };
    Ok(RegexBuilder::new(&source)
        .case_insensitive(!options.case_sensitive)
        .multi_line(true)
        .build()?)
}

fn byte_ranges(
    text: &str,
    pattern: &str,
    options: SearchOptions,
) -> Result<Vec<(usize, usize)>, SearchError> {
    if pattern.is_empty() {
        return Err(SearchError::EmptyPattern);
    }

    if options.case_sensitive && !options.use_regex {
        let finder = memmem::Finder::new(pattern.as_bytes());
        return Ok(finder
            .find_iter(text.as_bytes())
            .map(|start| (start, start + pattern.len()))
            .collect());
    }

    let re = build_regex(pattern, options)?;
    Ok(re
        .find_iter(text)
        .filter(|m| !m.as_str().is_empty())
        .map(|m| (m.start(), m.end()))
        .collect())
}

pub fn find_matches(
    text: &str,
    pattern: &str,
    options: SearchOptions,
) -> Result<Vec<Match>, SearchError> {
    let ranges = byte_ranges(text, pattern, options)?;

    let bytes = text.as_bytes();
    let mut line = 1;
    let mut cursor = 0;
    Ok(ranges
        .into_iter()
        .map(|(start, end)| {
            line += memchr::memchr_iter(b'\n', &bytes[cursor..start]).count();
            cursor = start;
            Match { start, end, line }
        })
        .collect())
}

/// 返回替换后的文本与替换次数；正则模式下替换串支持 `$1` 引用
pub fn replace_all(
    text: &str,
    pattern: &str,
    replacement: &str,
    options: SearchOptions,
) -> Result<(String, usize), SearchError> {
    if pattern.is_empty() {
        return Err(SearchError::EmptyPattern);
    }
    if options.use_regex {
        let re = build_regex(pattern, options)?;
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        let mut count = 0;
        // 与 find_matches 一致：空匹配不计数也不替换
        for caps in re.captures_iter(text) {
            let Some(m) = caps.get(0) else { continue };
            if m.as_str().is_empty() {
                continue;
            }
            out.push_str(&text[last..m.start()]);
            caps.expand(replacement, &mut out);
            last = m.end();
            count += 1;
        }
        if count == 0 {
            return Ok((text.to_string(), 0));
        }
        out.push_str(&text[last..]);
        return Ok((out, count));
    }

    let ranges = byte_ranges(text, pattern, options)?;
    if ranges.is_empty() {
        return Ok((text.to_string(), 0));
    }

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for &(start, end) in &ranges {
        out.push_str(&text[last..start]);
        out.push_str(replacement);
        last = end;
    }
    out.push_str(&text[last..]);
    Ok((out, ranges.len()))
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/search.rs"]
mod tests;
