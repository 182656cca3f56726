//! 应用数据路径
//!
//! 跨平台的数据目录：
//! - macOS: ~/Library/Application Support/codeplay
//! - Linux: ~/.local/share/codeplay
//! - Windows: %APPDATA%\codeplay

use std::path::{Path, PathBuf};

const APP_NAME: &str = "codeplay";
const LOG_DIR: &str = "logs";
const DOWNLOAD_DIR: &str = "downloads";
const PROGRESS_FILE: &str = "progress.json";

/// 获取应用数据目录
fn get_app_data_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        dirs_path_macos()
    }

    #[cfg(target_os = "linux")]
    {
        dirs_path_linux()
    }

    #[cfg(target_os = "windows")]
    {
        dirs_path_windows()
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        None
    }
}

#[cfg(target_os = "macos")]
fn dirs_path_macos() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(|home| {
        PathBuf::from(home)
            .join("Library/Application Support")
            .join(APP_NAME)
    })
}

#[cfg(target_os = "linux")]
fn dirs_path_linux() -> Option<PathBuf> {
    // 优先使用 XDG_DATA_HOME，否则使用 ~/.local/share
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        Some(PathBuf::from(xdg).join(APP_NAME))
    } else {
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".local/share").join(APP_NAME))
    }
}

#[cfg(target_os = "windows")]
fn dirs_path_windows() -> Option<PathBuf> {
    std::env::var("APPDATA")
        .ok()
        .map(|appdata| PathBuf::from(appdata).join(APP_NAME))
}

/// 获取日志目录路径
pub fn get_log_dir() -> Option<PathBuf> {
    get_app_data_dir().map(|p| p.join(LOG_DIR))
}

/// 未配置下载目录时的默认位置
pub fn get_download_dir() -> Option<PathBuf> {
    get_app_data_dir().map(|p| p.join(DOWNLOAD_DIR))
}

/// 练习答案与教程进度文件
pub fn get_progress_path() -> Option<PathBuf> {
    get_app_data_dir().map(|p| p.join(PROGRESS_FILE))
}

fn ensure_dir(dir: Option<PathBuf>, what: &str) -> std::io::Result<PathBuf> {
    let dir = dir.ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Cannot determine {} directory", what),
        )
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }

    Ok(dir)
}

/// 确保日志目录存在
pub fn ensure_log_dir() -> std::io::Result<PathBuf> {
    ensure_dir(get_log_dir(), "log")
}

/// 配置的下载目录优先
pub fn resolve_download_dir(configured: Option<&Path>) -> Option<PathBuf> {
    configured.map(Path::to_path_buf).or_else(get_download_dir)
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/paths.rs"]
mod tests;
