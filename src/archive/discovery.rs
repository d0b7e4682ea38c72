//! 归档文件发现模块

use crate::error::{AppError, ConfigError};
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

/// 扫描目录下的所有 MHTML 归档文件
///
/// # 参数
/// - `folder`: 归档目录
/// - `recursive`: 是否递归扫描子目录
///
/// # 返回
/// 返回按字典序排序的文件路径列表；排序保证合并的先见优先规则
/// 在多次运行之间可复现
pub fn discover_archives(folder: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let root = Path::new(folder);
    if !root.is_dir() {
        return Err(AppError::Config(ConfigError::InvalidInputFolder {
            path: folder.to_string(),
        })
        .into());
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut archives = Vec::new();

    for entry in WalkDir::new(root)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_file() && is_mhtml(entry.path()) {
            archives.push(entry.into_path());
        }
    }

    archives.sort();
    info!("📁 在 {} 中找到 {} 个归档文件", folder, archives.len());

    Ok(archives)
}

/// 判断文件扩展名是否为 MHTML
fn is_mhtml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("mhtml") || ext.eq_ignore_ascii_case("mht"))
        .unwrap_or(false)
}
