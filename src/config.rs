/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// MHTML 归档文件存放目录
    pub archive_folder: String,
    /// 是否递归扫描子目录
    pub recursive: bool,
    /// 是否导出 PDF
    pub enable_pdf: bool,
    /// 输出文档标题（未设置时取第一个归档的标题）
    pub output_title: Option<String>,
    /// 标题缺失时的输出文件基础名
    pub output_basename: String,
    /// 是否在题目旁标注出现频率
    pub show_frequency: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    /// PDF 渲染超时（秒）
    pub pdf_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            archive_folder: "Files".to_string(),
            recursive: false,
            enable_pdf: false,
            output_title: None,
            output_basename: "Consolidated_Assessment".to_string(),
            show_frequency: true,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            pdf_timeout_secs: 120,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            archive_folder: std::env::var("ARCHIVE_FOLDER").unwrap_or(default.archive_folder),
            recursive: std::env::var("RECURSIVE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.recursive),
            enable_pdf: std::env::var("ENABLE_PDF").ok().and_then(|v| v.parse().ok()).unwrap_or(default.enable_pdf),
            output_title: std::env::var("OUTPUT_TITLE").ok().filter(|v| !v.trim().is_empty()),
            output_basename: std::env::var("OUTPUT_BASENAME").unwrap_or(default.output_basename),
            show_frequency: std::env::var("SHOW_FREQUENCY").ok().and_then(|v| v.parse().ok()).unwrap_or(default.show_frequency),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            pdf_timeout_secs: std::env::var("PDF_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.pdf_timeout_secs),
        }
    }
}
