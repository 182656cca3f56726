//! 学习进度存储：练习答案草稿与已完成的教程
//!
//! 与标签页会话无关，单独持久化为一个 JSON 文件。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ProgressError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for ProgressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressError::Io(e) => write!(f, "progress io error: {}", e),
            ProgressError::Parse(e) => write!(f, "progress parse error: {}", e),
        }
    }
}

impl std::error::Error for ProgressError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProgressError::Io(e) => Some(e),
            ProgressError::Parse(e) => Some(e),
        }
    }
}

impl From<io::Error> for ProgressError {
    fn from(e: io::Error) -> Self {
        ProgressError::Io(e)
    }
}

impl From<serde_json::Error> for ProgressError {
    fn from(e: serde_json::Error) -> Self {
        ProgressError::Parse(e)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ProgressData {
    #[serde(default)]
    answers: BTreeMap<String, String>,
    #[serde(default)]
    completed_tutorials: Vec<String>,
}

#[derive(Debug)]
pub struct ProgressStore {
    path: PathBuf,
    data: ProgressData,
}

impl ProgressStore {
    /// 文件不存在时从空进度开始
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ProgressError> {
        let path = path.into();
        let data = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => ProgressData::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save_answer(
        &mut self,
        challenge_id: &str,
        answer: impl Into<String>,
    ) -> Result<(), ProgressError> {
        self.data
            .answers
            .insert(challenge_id.to_string(), answer.into());
        self.persist()
    }

    pub fn answer(&self, challenge_id: &str) -> Option<&str> {
        self.data.answers.get(challenge_id).map(String::as_str)
    }

    /// 已完成过返回 false
    pub fn mark_tutorial_completed(&mut self, tutorial_id: &str) -> Result<bool, ProgressError> {
        if self
            .data
            .completed_tutorials
            .iter()
            .any(|t| t == tutorial_id)
        {
            return Ok(false);
        }
        self.data.completed_tutorials.push(tutorial_id.to_string());
        self.persist()?;
        Ok(true)
    }

    pub fn completed_tutorials(&self) -> &[String] {
        &self.data.completed_tutorials
    }

    fn persist(&self) -> Result<(), ProgressError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(&self.data)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/progress.rs"]
mod tests;
