use std::fmt;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 归档解析错误
    Archive(ArchiveError),
    /// 文件操作错误
    File(FileError),
    /// PDF 渲染错误
    Render(RenderError),
    /// 配置错误
    Config(ConfigError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Archive(e) => write!(f, "归档错误: {}", e),
            AppError::File(e) => write!(f, "文件错误: {}", e),
            AppError::Render(e) => write!(f, "渲染错误: {}", e),
            AppError::Config(e) => write!(f, "配置错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Archive(e) => Some(e),
            AppError::File(e) => Some(e),
            AppError::Render(e) => Some(e),
            AppError::Config(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 归档解析错误
#[derive(Debug)]
pub enum ArchiveError {
    /// 读取归档文件失败
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// MIME 容器解析失败
    MimeParseFailed {
        path: String,
    },
    /// 归档中没有 HTML 部分
    NoHtmlPart {
        path: String,
    },
}

impl fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveError::ReadFailed { path, source } => {
                write!(f, "读取归档文件失败 ({}): {}", path, source)
            }
            ArchiveError::MimeParseFailed { path } => {
                write!(f, "MIME 容器解析失败: {}", path)
            }
            ArchiveError::NoHtmlPart { path } => {
                write!(f, "归档中没有 HTML 部分: {}", path)
            }
        }
    }
}

impl std::error::Error for ArchiveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArchiveError::ReadFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 文件操作错误
#[derive(Debug)]
pub enum FileError {
    /// 文件不存在
    NotFound {
        path: String,
    },
    /// 读取文件失败
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文件失败
    WriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 目录不存在
    DirectoryNotFound {
        path: String,
    },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::NotFound { path } => write!(f, "文件不存在: {}", path),
            FileError::ReadFailed { path, source } => {
                write!(f, "读取文件失败 ({}): {}", path, source)
            }
            FileError::WriteFailed { path, source } => {
                write!(f, "写入文件失败 ({}): {}", path, source)
            }
            FileError::DirectoryNotFound { path } => write!(f, "目录不存在: {}", path),
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::ReadFailed { source, .. } | FileError::WriteFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// PDF 渲染错误
#[derive(Debug)]
pub enum RenderError {
    /// 未找到外部渲染器
    RendererNotFound,
    /// 启动渲染器失败
    LaunchFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 渲染器执行失败
    ExecutionFailed {
        status: Option<i32>,
        stderr: String,
    },
    /// 渲染超时
    Timeout {
        seconds: u64,
    },
    /// 权限不足
    PermissionDenied {
        path: String,
    },
}

impl RenderError {
    /// 是否为可重试的瞬时错误
    ///
    /// 权限错误和渲染器缺失不会因重试而恢复
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            RenderError::ExecutionFailed { .. } | RenderError::Timeout { .. }
        )
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::RendererNotFound => {
                write!(f, "未找到 wkhtmltopdf，请安装并确保其在 PATH 中")
            }
            RenderError::LaunchFailed { source } => {
                write!(f, "启动渲染器失败: {}", source)
            }
            RenderError::ExecutionFailed { status, stderr } => {
                write!(f, "渲染器执行失败 (退出码: {:?}): {}", status, stderr)
            }
            RenderError::Timeout { seconds } => {
                write!(f, "渲染超时 ({}秒)", seconds)
            }
            RenderError::PermissionDenied { path } => {
                write!(f, "权限不足: {}", path)
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::LaunchFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 环境变量解析失败
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 输入目录无效
    InvalidInputFolder {
        path: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EnvVarParseFailed {
                var_name,
                value,
                expected_type,
            } => {
                write!(
                    f,
                    "环境变量 {} 解析失败: 值 '{}' 无法转换为 {}",
                    var_name, value, expected_type
                )
            }
            ConfigError::InvalidInputFolder { path } => {
                write!(f, "输入目录无效: {}", path)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ========== 从常见错误类型转换 ==========
// 注意：不需要手动实现 From<AppError> for anyhow::Error，
// 因为 anyhow 已经为所有实现了 std::error::Error 的类型提供了自动实现

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建归档读取错误
    pub fn archive_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Archive(ArchiveError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建 MIME 解析错误
    pub fn mime_parse_failed(path: impl Into<String>) -> Self {
        AppError::Archive(ArchiveError::MimeParseFailed { path: path.into() })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建渲染超时错误
    pub fn render_timeout(seconds: u64) -> Self {
        AppError::Render(RenderError::Timeout { seconds })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
