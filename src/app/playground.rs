use crate::kernel::services::adapters::{AppMessage, AsyncRuntime};
use crate::kernel::services::ports::{Capabilities, CodeExecutor, FilePicker, PlaygroundConfig};
use crate::kernel::{Action, AppState, Effect, Store};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct Playground {
    store: Store,
    runtime: AsyncRuntime,
    rx: Receiver<AppMessage>,
    picker: Option<Arc<dyn FilePicker>>,
    executor: Option<Arc<dyn CodeExecutor>>,
    /// 已发出、尚未收到结果消息的 effect 数
    in_flight: usize,
}

impl Playground {
    pub fn new(
        config: PlaygroundConfig,
        picker: Option<Arc<dyn FilePicker>>,
        executor: Option<Arc<dyn CodeExecutor>>,
    ) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let runtime = AsyncRuntime::new(tx)?;
        let capabilities = Capabilities::detect(picker.as_deref());
        if !capabilities.file_system_access {
            tracing::warn!("no file picker available, file system actions are disabled");
        }

        Ok(Self {
            store: Store::new(AppState::new(config, capabilities)),
            runtime,
            rx,
            picker,
            executor,
            in_flight: 0,
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight == 0
    }

    pub fn dispatch(&mut self, action: Action) -> bool {
        let result = self.store.dispatch(action);
        for effect in result.effects {
            self.run_effect(effect);
        }
        result.state_changed
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::PickFiles { accept, multiple } => {
                let Some(picker) = self.picker.clone() else {
                    tracing::warn!("pick_files requested without a picker");
                    return;
                };
                self.runtime.pick_files(picker, accept, multiple);
            }
            Effect::ReadFiles(handles) => self.runtime.read_files(handles),
            Effect::PickDirectory => {
                let Some(picker) = self.picker.clone() else {
                    tracing::warn!("pick_directory requested without a picker");
                    return;
                };
                self.runtime.pick_directory(picker);
            }
            Effect::LoadDirectory { handle, refresh } => {
                self.runtime.load_directory(handle, refresh)
            }
            Effect::WriteFile {
                tab,
                handle,
                content,
                version,
                silent,
            } => self
                .runtime
                .write_file(tab, handle, content, version, silent),
            Effect::Download {
                dir,
                file_name,
                content,
            } => self.runtime.download(dir, file_name, content),
            Effect::Execute(request) => self.runtime.execute(self.executor.clone(), request),
        }
        self.in_flight += 1;
    }

    pub fn handle_message(&mut self, msg: AppMessage) -> bool {
        let action = match msg {
            AppMessage::AutosaveTick => return self.dispatch(Action::AutosaveTick),
            AppMessage::FilesPicked(outcome) => Action::FilesPicked(outcome),
            AppMessage::FilesRead(files) => Action::FilesRead(files),
            AppMessage::DirectoryPicked(outcome) => Action::DirectoryPicked(outcome),
            AppMessage::DirectoryLoaded {
                handle,
                result,
                refresh,
            } => Action::DirectoryLoaded {
                handle,
                result,
                refresh,
            },
            AppMessage::FileWritten {
                tab,
                version,
                silent,
                result,
            } => Action::FileWritten {
                tab,
                version,
                silent,
                result,
            },
            AppMessage::Downloaded { name, result } => Action::Downloaded { name, result },
            AppMessage::ExecutionFinished(result) => Action::ExecutionFinished(result),
        };
        self.in_flight = self.in_flight.saturating_sub(1);
        self.dispatch(action)
    }

    /// 处理所有已到达的消息，不阻塞
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.rx.try_recv() {
                Ok(msg) => changed |= self.handle_message(msg),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        changed
    }

    /// 阻塞直到所有 effect 链都完成；超时返回 false
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(msg) => {
                    self.handle_message(msg);
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return false;
                }
            }
        }
        true
    }

    /// 让通知按时过期
    pub fn tick(&mut self, now: Instant) -> bool {
        self.dispatch(Action::Tick { now })
    }

    pub fn start_autosave(&mut self) {
        let config = &self.store.state().config;
        if !config.autosave_enabled {
            return;
        }
        let interval = config.autosave_interval();
        self.runtime.start_autosave(interval);
    }

    pub fn stop_autosave(&mut self) {
        self.runtime.stop_autosave();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/app/playground.rs"]
mod tests;
