//! 应用层：把 kernel Store 与异步运行时、选择器、执行服务接在一起

mod playground;

pub use playground::Playground;
