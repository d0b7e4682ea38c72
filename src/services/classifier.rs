//! 评分文本分类服务 - 业务能力层
//!
//! 只负责把 "Mark X out of Y" 形式的自由文本解析为判定结果

use crate::models::Verdict;
use regex::Regex;
use tracing::debug;

/// 评分文本分类器
pub struct GradeClassifier {
    pattern: Regex,
}

impl GradeClassifier {
    /// 创建新的分类器
    pub fn new() -> Self {
        Self {
            // 大小写不敏感，支持小数分值
            pattern: Regex::new(r"(?i)mark\s+(\d+(?:\.\d+)?)\s+out\s+of\s+(\d+(?:\.\d+)?)")
                .unwrap(),
        }
    }

    /// 将评分文本解析为判定结果
    ///
    /// # 参数
    /// - `grade_text`: 评分指示文本（可选）
    ///
    /// # 返回
    /// 解析失败或文本缺失时回退为"错误"（保守默认），不会报错
    pub fn classify(&self, grade_text: Option<&str>) -> Verdict {
        let Some(text) = grade_text else {
            debug!("评分文本缺失，按错误处理");
            return Verdict::Incorrect;
        };

        let Some(caps) = self.pattern.captures(text) else {
            debug!("评分文本无法解析，按错误处理: {}", text);
            return Verdict::Incorrect;
        };

        // 捕获组固定为数字格式，解析失败同样保守处理
        let mark: f64 = match caps[1].parse() {
            Ok(v) => v,
            Err(_) => return Verdict::Incorrect,
        };
        let total: f64 = match caps[2].parse() {
            Ok(v) => v,
            Err(_) => return Verdict::Incorrect,
        };

        if total <= 0.0 {
            return Verdict::Incorrect;
        }
        if mark >= total {
            // 超出满分视为满分（沿用原始评分策略）
            return Verdict::Correct;
        }
        if mark <= 0.0 {
            return Verdict::Incorrect;
        }
        Verdict::PartiallyCorrect
    }
}

impl Default for GradeClassifier {
    fn default() -> Self {
        Self::new()
    }
}
