//! 归档处理模块
//!
//! 负责 MHTML 归档文件的发现与解析

pub mod discovery;
pub mod reader;

pub use discovery::discover_archives;
pub use reader::{read_archive, ArchiveContent};
