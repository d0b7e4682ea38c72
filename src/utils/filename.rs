//! 文件名清理模块
//!
//! 把任意标题文本映射为文件系统安全的基础名

/// 基础名最大字符数
const MAX_BASENAME_CHARS: usize = 120;

/// 清理标题为文件系统安全的基础名
///
/// # 参数
/// - `title`: 任意标题文本
/// - `fallback`: 清理后为空时使用的兜底名称
///
/// # 返回
/// 返回可直接用作文件名的基础名（不含扩展名）
pub fn sanitize_basename(title: &str, fallback: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => ' ',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect();

    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    // 末尾的点在 Windows 上不合法
    let trimmed = collapsed.trim_matches(|c| c == '.' || c == ' ');

    let bounded: String = trimmed.chars().take(MAX_BASENAME_CHARS).collect();
    if bounded.is_empty() {
        fallback.to_string()
    } else {
        bounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_chars_removed() {
        assert_eq!(
            sanitize_basename("Quiz: attempt/review?", "fallback"),
            "Quiz attempt review"
        );
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(
            sanitize_basename("  Data   Structures \n Quiz ", "fallback"),
            "Data Structures Quiz"
        );
    }

    #[test]
    fn test_empty_title_uses_fallback() {
        assert_eq!(sanitize_basename("///", "Consolidated_Assessment"), "Consolidated_Assessment");
        assert_eq!(sanitize_basename("", "Consolidated_Assessment"), "Consolidated_Assessment");
    }

    #[test]
    fn test_length_bounded() {
        let long = "x".repeat(500);
        assert_eq!(sanitize_basename(&long, "f").chars().count(), MAX_BASENAME_CHARS);
    }
}
