//! 测试模块根目录
//!
//! 按组件组织的集成测试

pub mod scanner;
pub mod store;
