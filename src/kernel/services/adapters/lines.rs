//! 行输入源：后台线程逐行读取，经 mpsc 交给使用方
//!
//! 主循环与提示式选择器共用同一个来源，避免两处同时读 stdin。

use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRead {
    Line,
    Idle,
    Closed,
}

#[derive(Clone)]
pub struct LineSource {
    rx: Arc<Mutex<Receiver<String>>>,
}

impl LineSource {
    pub fn stdin() -> io::Result<Self> {
        Self::from_reader(io::BufReader::new(io::stdin()))
    }

    /// 读到 EOF 或出错后发送端关闭，`recv` 随之返回 `None`
    pub fn from_reader<R>(reader: R) -> io::Result<Self>
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("codeplay-input".to_string())
            .spawn(move || {
                for line in reader.lines() {
                    let line = match line {
                        Ok(line) => line,
                        Err(e) => {
                            tracing::warn!(error = %e, "input read failed");
                            break;
                        }
                    };
                    if tx.send(line).is_err() {
                        break;
                    }
                }
            })?;
        Ok(Self::from_receiver(rx))
    }

    pub fn from_receiver(rx: Receiver<String>) -> Self {
        Self {
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    pub fn recv(&self) -> Option<String> {
        self.rx
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .recv()
            .ok()
    }

    pub fn recv_timeout(&self, timeout: Duration, line: &mut String) -> LineRead {
        let received = self
            .rx
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .recv_timeout(timeout);
        match received {
            Ok(text) => {
                *line = text;
                LineRead::Line
            }
            Err(RecvTimeoutError::Timeout) => LineRead::Idle,
            Err(RecvTimeoutError::Disconnected) => LineRead::Closed,
        }
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/lines.rs"]
mod tests;
