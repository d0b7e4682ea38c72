//! # Quiz Consolidator
//!
//! 把多份 Moodle 测验回顾页面的 MHTML 快照（每次作答一份）
//! 合并为单个自包含 HTML 文档：每道不同题目只保留一份，
//! 优先保留答对的那一次作答
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 归档层（Archive）
//! - `archive/discovery` - 扫描目录，按字典序返回 MHTML 文件
//! - `archive/reader` - 解析 MIME 容器为正文/资源/页眉/标题/样式
//!
//! ### ② 业务能力层（Services）
//! - `GradeClassifier` - "Mark X out of Y" → 判定结果
//! - `FragmentExtractor` - 正文 HTML → 题目片段（div.que）
//! - `Reconciler` - 按题干去重，判定优先级高者胜出，平局先见优先
//! - `DocumentRenderer` - 重新编号、频率标注、图片内嵌、装配文档
//! - `PdfExporter` - 调用 wkhtmltopdf 导出分页 PDF（可选）
//!
//! ### ③ 编排层（App）
//! - `app` - 顺序流水线：发现 → 收集 → 合并 → 渲染 → 输出
//!
//! ## 数据流
//!
//! ```text
//! 归档文件 → reader → extractor (+ 资源映射)
//!     ↓
//! 片段池 → Reconciler → DocumentRenderer → 输出文档 (→ PDF)
//! ```

pub mod app;
pub mod archive;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use app::App;
pub use archive::{discover_archives, read_archive, ArchiveContent};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{AssetMap, AssetPayload, QuestionFragment, ReconciledEntry, Verdict};
pub use services::{
    DocumentRenderer, FragmentExtractor, GradeClassifier, PdfExporter, Reconciler,
};
