//! 题目片段提取服务 - 业务能力层
//!
//! 从一份归档的正文 HTML 中定位所有题目子树（div.que），
//! 并为每个子树派生身份文本和判定结果

use crate::models::QuestionFragment;
use crate::services::classifier::GradeClassifier;
use crate::utils::text::element_text;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// 题目片段提取器
pub struct FragmentExtractor {
    question_selector: Selector,
    qtext_selector: Selector,
    grade_selector: Selector,
    classifier: GradeClassifier,
}

impl FragmentExtractor {
    /// 创建新的提取器
    pub fn new() -> Self {
        Self {
            question_selector: Selector::parse("div.que").unwrap(),
            qtext_selector: Selector::parse("div.qtext").unwrap(),
            grade_selector: Selector::parse("div.grade").unwrap(),
            classifier: GradeClassifier::new(),
        }
    }

    /// 提取正文中的所有题目片段
    ///
    /// # 参数
    /// - `document`: 已解析的正文 HTML
    /// - `source_archive`: 来源归档编号（从 1 开始，用于日志）
    ///
    /// # 返回
    /// 按文档顺序惰性产出片段，单次遍历；
    /// 缺少题干区域的片段无法作为合并键，记录日志后丢弃
    pub fn extract<'a>(
        &'a self,
        document: &'a Html,
        source_archive: usize,
    ) -> impl Iterator<Item = QuestionFragment> + 'a {
        document
            .select(&self.question_selector)
            .filter_map(move |el| self.build_fragment(el, source_archive))
    }

    /// 从单个 div.que 子树构建题目片段
    fn build_fragment(&self, el: ElementRef<'_>, source_archive: usize) -> Option<QuestionFragment> {
        let question_text = match el.select(&self.qtext_selector).next() {
            Some(qtext) => element_text(&qtext),
            None => {
                warn!("[归档 {}] 题目片段缺少题干区域，已丢弃", source_archive);
                return None;
            }
        };

        if question_text.is_empty() {
            warn!("[归档 {}] 题干文本为空，已丢弃", source_archive);
            return None;
        }

        let grade_text = el
            .select(&self.grade_selector)
            .next()
            .map(|grade| element_text(&grade));
        let verdict = self.classifier.classify(grade_text.as_deref());

        Some(QuestionFragment {
            html: el.html(),
            question_text,
            verdict,
            source_archive,
        })
    }
}

impl Default for FragmentExtractor {
    fn default() -> Self {
        Self::new()
    }
}
