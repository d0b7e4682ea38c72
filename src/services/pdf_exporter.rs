//! PDF 导出服务 - 业务能力层
//!
//! 调用外部 wkhtmltopdf 子进程把合并文档转换为分页 PDF，
//! 每道题目单独一页；导出失败只产生警告，不影响主输出

use crate::config::Config;
use crate::error::{AppError, RenderError};
use anyhow::Result;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// wkhtmltopdf 的常见安装路径（PATH 探测之前先检查）
const COMMON_PATHS: &[&str] = &[
    "/usr/bin/wkhtmltopdf",
    "/usr/local/bin/wkhtmltopdf",
    "/opt/homebrew/bin/wkhtmltopdf",
    r"C:\Program Files\wkhtmltopdf\bin\wkhtmltopdf.exe",
    r"C:\Program Files (x86)\wkhtmltopdf\bin\wkhtmltopdf.exe",
];

/// 分页与图片缩放样式：每道题目强制分页，图片不超过页宽
const PAGE_STYLE: &str =
    "<style>div.que { page-break-before: always; page-break-inside: avoid; } \
     img { max-width: 100%; }</style>";

/// PDF 导出器
pub struct PdfExporter {
    timeout_secs: u64,
}

impl PdfExporter {
    /// 创建新的导出器
    pub fn new(config: &Config) -> Self {
        Self {
            timeout_secs: config.pdf_timeout_secs,
        }
    }

    /// 把合并文档导出为 PDF
    ///
    /// # 参数
    /// - `html`: 合并文档内容
    /// - `output_pdf`: 输出 PDF 路径
    ///
    /// # 返回
    /// 瞬时失败（执行失败/超时）允许重试一次；
    /// 权限错误和渲染器缺失直接上报，由调用方降级为警告
    pub async fn export(&self, html: &str, output_pdf: &Path) -> Result<()> {
        let Some(renderer) = locate_renderer().await else {
            return Err(AppError::Render(RenderError::RendererNotFound).into());
        };
        debug!("使用渲染器: {}", renderer);

        // 注入分页样式后写入临时文件供子进程读取
        let paged_html = inject_page_style(html);
        let temp = tempfile::Builder::new()
            .prefix("quiz_consolidator_")
            .suffix(".html")
            .tempfile()
            .map_err(|e| AppError::file_write_failed("临时文件", e))?;
        std::fs::write(temp.path(), &paged_html)
            .map_err(|e| AppError::file_write_failed(temp.path().display().to_string(), e))?;

        match self.run_once(&renderer, temp.path(), output_pdf).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_transient() => {
                warn!("⚠️ PDF 渲染失败，5 秒后重试一次: {}", e);
                tokio::time::sleep(Duration::from_secs(5)).await;
                self.run_once(&renderer, temp.path(), output_pdf)
                    .await
                    .map_err(|e| AppError::Render(e).into())
            }
            Err(e) => Err(AppError::Render(e).into()),
        }
    }

    /// 执行一次渲染子进程（有界等待）
    async fn run_once(
        &self,
        renderer: &str,
        input_html: &Path,
        output_pdf: &Path,
    ) -> std::result::Result<(), RenderError> {
        let mut command = Command::new(renderer);
        command
            .arg("--no-outline")
            .args(["--page-size", "A4"])
            .args(["--margin-top", "20mm"])
            .args(["--margin-right", "20mm"])
            .args(["--margin-bottom", "20mm"])
            .args(["--margin-left", "20mm"])
            .args(["--footer-right", "[page]"])
            .args(["--footer-font-size", "10"])
            .arg("--disable-smart-shrinking")
            .arg("--enable-local-file-access")
            .arg(input_html)
            .arg(output_pdf);

        let waited = tokio::time::timeout(
            Duration::from_secs(self.timeout_secs),
            command.output(),
        )
        .await;

        let output = match waited {
            Err(_) => {
                return Err(RenderError::Timeout {
                    seconds: self.timeout_secs,
                })
            }
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                return Err(RenderError::PermissionDenied {
                    path: renderer.to_string(),
                })
            }
            Ok(Err(e)) => {
                return Err(RenderError::LaunchFailed {
                    source: Box::new(e),
                })
            }
            Ok(Ok(output)) => output,
        };

        if !output.status.success() {
            return Err(RenderError::ExecutionFailed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr)
                    .chars()
                    .take(500)
                    .collect(),
            });
        }

        info!("✓ PDF 已保存: {}", output_pdf.display());
        Ok(())
    }
}

/// 查找 wkhtmltopdf 可执行文件
///
/// 先检查常见安装路径，再通过 --version 探测 PATH
async fn locate_renderer() -> Option<String> {
    for path in COMMON_PATHS {
        if Path::new(path).exists() {
            return Some((*path).to_string());
        }
    }

    let probe = Command::new("wkhtmltopdf").arg("--version").output().await;
    match probe {
        Ok(output) if output.status.success() => Some("wkhtmltopdf".to_string()),
        _ => None,
    }
}

/// 在文档头部注入分页样式
fn inject_page_style(html: &str) -> String {
    if html.contains("</head>") {
        html.replacen("</head>", &format!("{}</head>", PAGE_STYLE), 1)
    } else {
        format!("{}{}", PAGE_STYLE, html)
    }
}
