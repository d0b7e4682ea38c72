use anyhow::Result;
/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use std::fs;
use tracing::info;

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
///
/// # 返回
/// 返回是否成功初始化
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n归档合并日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `archive_folder`: 归档目录
/// - `recursive`: 是否递归扫描
pub fn log_startup(archive_folder: &str, recursive: bool) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 测验归档合并模式");
    info!("📁 归档目录: {}", archive_folder);
    info!("🔄 递归扫描: {}", if recursive { "开启" } else { "关闭" });
    info!("{}", "=".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `processed`: 成功处理的归档数
/// - `failed`: 失败的归档数
/// - `distinct`: 去重后的题目总数
/// - `breakdown`: 各判定等级的题目数量（正确/部分正确/错误）
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(
    processed: usize,
    failed: usize,
    distinct: usize,
    breakdown: (usize, usize, usize),
    log_file_path: &str,
) {
    let (correct, partial, incorrect) = breakdown;
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 归档: 成功 {}/{}", processed, processed + failed);
    info!("📝 去重后题目总数: {}", distinct);
    info!(
        "📈 判定分布: 正确 {} | 部分正确 {} | 错误 {}",
        correct, partial, incorrect
    );
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
