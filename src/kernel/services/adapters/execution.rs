//! 本地进程执行器：把源码写入临时目录，用配置的解释器运行
//!
//! 子进程由 tokio 驱动，超时后杀掉并返回 `ExecutionError::TimedOut`。

use crate::kernel::services::ports::{
    CodeExecutor, ExecutionConfig, ExecutionError, ExecutionOutput, ExecutionRequest,
};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

pub struct ProcessExecutor {
    config: ExecutionConfig,
    scratch_root: PathBuf,
    counter: AtomicU64,
}

impl ProcessExecutor {
    pub fn new(config: ExecutionConfig) -> Self {
        Self::with_scratch_root(config, std::env::temp_dir())
    }

    pub fn with_scratch_root(config: ExecutionConfig, scratch_root: PathBuf) -> Self {
        Self {
            config,
            scratch_root,
            counter: AtomicU64::new(0),
        }
    }

    fn scratch_dir(&self) -> PathBuf {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        self.scratch_root
            .join(format!("codeplay-run-{}-{}", std::process::id(), n))
    }

    async fn run_in(
        &self,
        dir: &Path,
        request: &ExecutionRequest,
    ) -> Result<ExecutionOutput, ExecutionError> {
        let spec = self
            .config
            .interpreter(request.language)
            .ok_or(ExecutionError::Unsupported(request.language))?;

        tokio::fs::create_dir_all(dir).await?;
        let source_path = dir.join(format!("main.{}", request.language.canonical_extension()));
        tokio::fs::write(&source_path, &request.source).await?;

        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .arg(&source_path)
            .current_dir(dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if request.stdin.is_some() {
            command.stdin(Stdio::piped());
        } else {
            command.stdin(Stdio::null());
        }

        let start = Instant::now();
        let mut child = command
            .spawn()
            .map_err(|e| ExecutionError::Spawn(format!("{}: {}", spec.program, e)))?;

        let stdin = child.stdin.take();
        let input = request.stdin.clone();
        let feed = tokio::spawn(async move {
            if let (Some(mut pipe), Some(input)) = (stdin, input) {
                pipe.write_all(input.as_bytes()).await?;
                pipe.shutdown().await?;
            }
            Ok::<(), std::io::Error>(())
        });

        // 输出在等待期间持续读取，写满管道的程序不会卡住
        let timeout = self.config.timeout();
        let run = async {
            let output = child.wait_with_output().await;
            if let Ok(Err(e)) = feed.await {
                tracing::debug!(error = %e, "stdin not fully consumed");
            }
            output
        };
        let output = match tokio::time::timeout(timeout, run).await {
            Ok(output) => output?,
            Err(_) => {
                tracing::warn!(
                    program = %spec.program,
                    timeout_ms = timeout.as_millis() as u64,
                    "execution timed out"
                );
                return Err(ExecutionError::TimedOut(timeout));
            }
        };

        tracing::info!(
            language = request.language.language_id(),
            exit_code = ?output.status.code(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "execution finished"
        );

        Ok(ExecutionOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_status: output.status.code(),
        })
    }
}

/// 在 blocking 线程上借用所在 runtime；没有 runtime 时临时建一个
fn block_on<F: Future>(future: F) -> Result<F::Output, ExecutionError> {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => Ok(handle.block_on(future)),
        Err(_) => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            Ok(runtime.block_on(future))
        }
    }
}

impl CodeExecutor for ProcessExecutor {
    fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionOutput, ExecutionError> {
        let dir = self.scratch_dir();
        let result = block_on(self.run_in(&dir, request)).and_then(|result| result);
        if dir.exists() {
            if let Err(e) = std::fs::remove_dir_all(&dir) {
                tracing::debug!(path = %dir.display(), error = %e, "scratch cleanup failed");
            }
        }
        result
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/execution.rs"]
mod tests;
