//! codeplay - 代码练习场的文件与标签会话核心
//!
//! 模块结构：
//! - models: 数据模型（FileHandle, DirHandle, FileTree）
//! - kernel: 无界面核心（会话、语言识别、代码检查、通知、查找替换、Store）
//! - kernel::services: 端口与适配器（文件桥接、选择器、运行时、执行服务、设置）
//! - app: 应用层（Playground）

pub mod app;
pub mod kernel;
pub mod models;
