//! 业务能力层（Services）
//!
//! 每个服务只描述"我能做什么"，不关心整体流程：
//! - `GradeClassifier` - 评分文本 → 判定结果
//! - `FragmentExtractor` - 正文 HTML → 题目片段
//! - `Reconciler` - 片段流 → 去重合并条目
//! - `DocumentRenderer` - 合并条目 → 最终文档
//! - `PdfExporter` - 最终文档 → 分页 PDF（外部渲染器）

pub mod classifier;
pub mod extractor;
pub mod pdf_exporter;
pub mod reconciler;
pub mod renderer;

pub use classifier::GradeClassifier;
pub use extractor::FragmentExtractor;
pub use pdf_exporter::PdfExporter;
pub use reconciler::Reconciler;
pub use renderer::DocumentRenderer;
