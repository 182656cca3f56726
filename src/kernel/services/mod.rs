//! 服务层（ports + adapters）
//!
//! - `ports`: 跨模块使用的纯契约/类型（面向 kernel）
//! - `adapters`: 与操作系统/运行时相关的实现（IO/异步）

pub mod adapters;
pub mod ports;
