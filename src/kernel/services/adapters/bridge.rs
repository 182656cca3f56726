//! 文件系统桥接：读写文件、构建目录树、下载
//!
//! 写入顺序固定为 创建/截断 -> 写入 -> flush，全部完成后才返回。

use crate::kernel::language::is_allowed_file;
use crate::kernel::services::ports::{BridgeError, OpenedFile};
use crate::models::{build_file_tree, DirHandle, FileHandle, FileTree};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

pub async fn read_file(handle: &FileHandle) -> Result<String, BridgeError> {
    Ok(tokio::fs::read_to_string(handle.path()).await?)
}

pub async fn read_files(handles: Vec<FileHandle>) -> Vec<OpenedFile> {
    let mut opened = Vec::with_capacity(handles.len());
    for handle in handles {
        let content = read_file(&handle).await;
        if let Err(e) = &content {
            tracing::warn!(path = %handle.path().display(), error = %e, "read failed");
        }
        opened.push(OpenedFile { handle, content });
    }
    opened
}

pub async fn write_file(handle: &FileHandle, content: &str) -> Result<(), BridgeError> {
    let mut file = tokio::fs::File::create(handle.path()).await?;
    file.write_all(content.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

/// 阻塞调用，放在 `spawn_blocking` 里执行
pub fn build_tree(handle: &DirHandle) -> Result<FileTree, BridgeError> {
    Ok(build_file_tree(handle.path(), &is_allowed_file)?)
}

/// 目标已存在时追加序号，不覆盖旧文件
pub async fn download(dir: &Path, file_name: &str, content: &str) -> Result<PathBuf, BridgeError> {
    tokio::fs::create_dir_all(dir).await?;
    let path = unique_path(dir, file_name).await;
    tokio::fs::write(&path, content).await?;
    Ok(path)
}

async fn unique_path(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !exists(&candidate).await {
        return candidate;
    }

    let name = Path::new(file_name);
    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file_name.to_string());
    let ext = name.extension().map(|e| e.to_string_lossy().to_string());

    let mut n = 1u32;
    loop {
        let next = match &ext {
            Some(ext) => format!("{} ({}).{}", stem, n, ext),
            None => format!("{} ({})", stem, n),
        };
        let candidate = dir.join(next);
        if !exists(&candidate).await {
            return candidate;
        }
        n = n.saturating_add(1);
    }
}

async fn exists(path: &Path) -> bool {
    tokio::fs::metadata(path).await.is_ok()
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/bridge.rs"]
mod tests;
