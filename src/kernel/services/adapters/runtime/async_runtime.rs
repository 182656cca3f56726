use super::message::AppMessage;
use crate::kernel::services::adapters::bridge;
use crate::kernel::services::ports::{
    BridgeError, BridgeOutcome, CodeExecutor, ExecutionError, ExecutionRequest, FilePicker,
};
use crate::kernel::session::TabId;
use crate::models::{DirHandle, FileHandle};
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

const MIN_AUTOSAVE_INTERVAL: Duration = Duration::from_millis(10);

pub struct AsyncRuntime {
    runtime: tokio::runtime::Runtime,
    tx: Sender<AppMessage>,
    autosave: Option<JoinHandle<()>>,
}

impl AsyncRuntime {
    pub fn new(tx: Sender<AppMessage>) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .or_else(|e| {
                tracing::error!(
                    error = %e,
                    "Failed to create multi-thread tokio runtime, falling back to current-thread"
                );
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
            })?;
        Ok(Self {
            runtime,
            tx,
            autosave: None,
        })
    }

    pub fn pick_files(&self, picker: Arc<dyn FilePicker>, accept: Vec<String>, multiple: bool) {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = tokio::task::spawn_blocking(move || {
                let accept: Vec<&str> = accept.iter().map(String::as_str).collect();
                picker.pick_files(&accept, multiple)
            })
            .await;
            let outcome = match result {
                Ok(picked) => BridgeOutcome::from_pick(picked),
                Err(e) => BridgeOutcome::Failed(BridgeError::Picker(e.to_string())),
            };
            let _ = tx.send(AppMessage::FilesPicked(outcome));
        });
    }

    pub fn read_files(&self, handles: Vec<FileHandle>) {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let opened = bridge::read_files(handles).await;
            let _ = tx.send(AppMessage::FilesRead(opened));
        });
    }

    pub fn pick_directory(&self, picker: Arc<dyn FilePicker>) {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = tokio::task::spawn_blocking(move || picker.pick_directory()).await;
            let outcome = match result {
                Ok(picked) => BridgeOutcome::from_pick(picked),
                Err(e) => BridgeOutcome::Failed(BridgeError::Picker(e.to_string())),
            };
            let _ = tx.send(AppMessage::DirectoryPicked(outcome));
        });
    }

    pub fn load_directory(&self, handle: DirHandle, refresh: bool) {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let for_build = handle.clone();
            let result = match tokio::task::spawn_blocking(move || bridge::build_tree(&for_build))
                .await
            {
                Ok(result) => result,
                Err(e) => Err(BridgeError::Io(e.to_string())),
            };
            let _ = tx.send(AppMessage::DirectoryLoaded {
                handle,
                result,
                refresh,
            });
        });
    }

    pub fn write_file(
        &self,
        tab: TabId,
        handle: FileHandle,
        content: String,
        version: u64,
        silent: bool,
    ) {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = bridge::write_file(&handle, &content).await;
            if let Err(e) = &result {
                tracing::warn!(path = %handle.path().display(), error = %e, "write failed");
            }
            let _ = tx.send(AppMessage::FileWritten {
                tab,
                version,
                silent,
                result,
            });
        });
    }

    pub fn download(&self, dir: PathBuf, file_name: String, content: String) {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = bridge::download(&dir, &file_name, &content).await;
            let _ = tx.send(AppMessage::Downloaded {
                name: file_name,
                result,
            });
        });
    }

    pub fn execute(&self, executor: Option<Arc<dyn CodeExecutor>>, request: ExecutionRequest) {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let Some(executor) = executor else {
                let _ = tx.send(AppMessage::ExecutionFinished(Err(ExecutionError::Unavailable)));
                return;
            };
            let result = match tokio::task::spawn_blocking(move || executor.execute(&request)).await
            {
                Ok(result) => result,
                Err(e) => Err(ExecutionError::Spawn(e.to_string())),
            };
            let _ = tx.send(AppMessage::ExecutionFinished(result));
        });
    }

    /// 重复调用会替换旧的计时器
    pub fn start_autosave(&mut self, interval: Duration) {
        self.stop_autosave();
        let interval = interval.max(MIN_AUTOSAVE_INTERVAL);
        let tx = self.tx.clone();
        let task = self.runtime.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // 第一次 tick 立即完成
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if tx.send(AppMessage::AutosaveTick).is_err() {
                    break;
                }
            }
        });
        tracing::debug!(interval_ms = interval.as_millis() as u64, "autosave started");
        self.autosave = Some(task);
    }

    pub fn stop_autosave(&mut self) {
        if let Some(task) = self.autosave.take() {
            task.abort();
        }
    }

    pub fn autosave_running(&self) -> bool {
        self.autosave.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for AsyncRuntime {
    fn drop(&mut self) {
        self.stop_autosave();
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/runtime/async_runtime.rs"]
mod tests;
