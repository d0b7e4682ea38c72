//! 文本处理辅助函数

use scraper::ElementRef;

/// 折叠空白字符
///
/// 将任意空白序列压缩为单个空格并去除首尾空白
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 提取元素的全部文本并折叠空白
pub fn element_text(el: &ElementRef) -> String {
    collapse_whitespace(&el.text().collect::<Vec<_>>().join(" "))
}

/// 转义 HTML 特殊字符（用于标题等文本插值）
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  What   is\n a stack? "), "What is a stack?");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"A<B & "C""#), "A&lt;B &amp; &quot;C&quot;");
    }
}
