//! 异步运行时适配器：执行 IO effect 并把结果作为消息发回前端循环

mod async_runtime;
mod message;

pub use async_runtime::AsyncRuntime;
pub use message::AppMessage;
