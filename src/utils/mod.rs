//! 工具模块

pub mod filename;
pub mod logging;
pub mod text;
