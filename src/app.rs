//! 应用编排层
//!
//! 串联完整流水线：发现归档 → 逐个读取提取 → 跨归档合并 → 渲染输出 → 可选 PDF。
//! 严格顺序处理，归档按字典序访问，保证先见优先规则可复现

use crate::archive::{self, ArchiveContent};
use crate::config::Config;
use crate::error::AppError;
use crate::models::AssetMap;
use crate::services::{DocumentRenderer, FragmentExtractor, PdfExporter, Reconciler};
use crate::utils::filename::sanitize_basename;
use crate::utils::logging;
use anyhow::Result;
use scraper::Html;
use std::collections::HashMap;
use std::path::Path;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
}

/// 处理统计
#[derive(Debug, Default)]
struct ProcessingStats {
    /// 成功处理的归档数
    processed: usize,
    /// 读取或解析失败的归档数
    failed: usize,
    /// 提取到的片段总数（去重前）
    fragments: usize,
}

/// 从第一份成功解析的归档携带到输出的标记内容
#[derive(Debug, Default)]
struct CarriedMarkup {
    header: Option<String>,
    title: Option<String>,
    styles: String,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        logging::init_log_file(&config.output_log_file)?;
        logging::log_startup(&config.archive_folder, config.recursive);
        Ok(Self { config })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        let archives =
            archive::discover_archives(&self.config.archive_folder, self.config.recursive)?;

        if archives.is_empty() {
            warn!("⚠️ 没有找到待处理的 MHTML 文件，程序结束");
            return Ok(());
        }

        // ========== 收集阶段：逐个归档读取、提取、归并 ==========
        let extractor = FragmentExtractor::new();
        let mut reconciler = Reconciler::new();
        let mut assets: AssetMap = HashMap::new();
        let mut carried = CarriedMarkup::default();
        let mut stats = ProcessingStats::default();

        for (idx, path) in archives.iter().enumerate() {
            let archive_index = idx + 1;
            info!("\n[归档 {}] 正在处理: {}", archive_index, path.display());

            let content = match archive::read_archive(path).await {
                Ok(content) => content,
                Err(e) => {
                    error!("[归档 {}] ❌ 读取失败，跳过: {}", archive_index, e);
                    stats.failed += 1;
                    continue;
                }
            };

            merge_assets(&mut assets, &content);

            let Some(body) = content.body.as_deref() else {
                warn!("[归档 {}] ⚠️ 没有 HTML 部分，跳过", archive_index);
                stats.failed += 1;
                continue;
            };

            // 页眉/标题/样式只从第一份成功解析的归档携带
            if stats.processed == 0 {
                carried = CarriedMarkup {
                    header: content.header.clone(),
                    title: content.title.clone(),
                    styles: content.styles.clone(),
                };
            }

            let document = Html::parse_document(body);
            let mut count = 0;
            for fragment in extractor.extract(&document, archive_index) {
                count += 1;
                reconciler.merge(fragment);
            }

            info!("[归档 {}] ✓ 提取到 {} 个题目片段", archive_index, count);
            if self.config.verbose_logging {
                info!(
                    "[归档 {}] 资源累计 {} 个，去重后题目累计 {} 个",
                    archive_index,
                    assets.len(),
                    reconciler.len()
                );
            }

            stats.fragments += count;
            stats.processed += 1;
        }

        if stats.processed == 0 {
            warn!("⚠️ 所有归档均无法解析，没有可合并的内容");
            return Ok(());
        }

        // ========== 渲染阶段 ==========
        let title = self
            .config
            .output_title
            .clone()
            .or_else(|| carried.title.clone())
            .unwrap_or_else(|| "Consolidated Assessment".to_string());

        let breakdown = reconciler.verdict_breakdown();
        let distinct = reconciler.len();
        let entries = reconciler.into_entries();

        info!(
            "\n📝 合并完成: {} 个片段 → {} 个不同题目",
            stats.fragments, distinct
        );

        let renderer = DocumentRenderer::new(&self.config);
        let html = renderer.render(
            &entries,
            &assets,
            carried.header.as_deref(),
            &title,
            &carried.styles,
            stats.processed,
        );

        let basename = sanitize_basename(&title, &self.config.output_basename);
        let output_html = format!("{}.html", basename);
        tokio::fs::write(&output_html, &html)
            .await
            .map_err(|e| AppError::file_write_failed(output_html.clone(), e))?;
        info!("✅ 合并文档已保存: {}", output_html);

        // ========== 可选 PDF 导出（失败不影响主输出） ==========
        if self.config.enable_pdf {
            let output_pdf = format!("{}.pdf", basename);
            let exporter = PdfExporter::new(&self.config);
            if let Err(e) = exporter.export(&html, Path::new(&output_pdf)).await {
                warn!("⚠️ PDF 导出失败（主输出不受影响）: {}", e);
            }
        }

        logging::print_final_stats(
            stats.processed,
            stats.failed,
            distinct,
            breakdown,
            &self.config.output_log_file,
        );

        Ok(())
    }
}

/// 把一份归档的资源并入全局资源映射
///
/// 跨归档键冲突时先见者优先
fn merge_assets(assets: &mut AssetMap, content: &ArchiveContent) {
    for (key, payload) in content.assets.iter() {
        assets
            .entry(key.clone())
            .or_insert_with(|| payload.clone());
    }
}
