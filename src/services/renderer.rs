//! 文档渲染服务 - 业务能力层
//!
//! 对合并后的片段集合重新编号、注入频率标注、
//! 把图片引用改写为自包含 data URI，并装配最终文档

use crate::config::Config;
use crate::models::{AssetMap, ReconciledEntry};
use crate::utils::text::escape_html;
use regex::Regex;
use tracing::{debug, warn};

/// 文档渲染器
pub struct DocumentRenderer {
    /// 编号标记：span.rui-qno 内的第一段数字文本
    qno_pattern: Regex,
    /// 图片引用：img 标签的 src 属性
    img_src_pattern: Regex,
    /// 片段的信息区域开标签（频率标注的插入点）
    info_pattern: Regex,
    /// 页眉内的第一个标题元素
    heading_pattern: Regex,
    show_frequency: bool,
}

impl DocumentRenderer {
    /// 创建新的渲染器
    pub fn new(config: &Config) -> Self {
        Self {
            qno_pattern: Regex::new(
                r#"(<span[^>]*class="[^"]*\brui-qno\b[^"]*"[^>]*>[^<0-9]*)([0-9]+)"#,
            )
            .unwrap(),
            img_src_pattern: Regex::new(r#"(<img[^>]+src=")([^"]+)(")"#).unwrap(),
            info_pattern: Regex::new(r#"<div[^>]*class="[^"]*\binfo\b[^"]*"[^>]*>"#).unwrap(),
            heading_pattern: Regex::new(r"(?s)(<h[1-6][^>]*>).*?(</h[1-6]>)").unwrap(),
            show_frequency: config.show_frequency,
        }
    }

    /// 渲染最终合并文档
    ///
    /// # 参数
    /// - `entries`: 按首见顺序排列的合并条目
    /// - `assets`: 跨归档合并后的资源映射
    /// - `header`: 第一份归档携带的页眉 HTML
    /// - `title`: 输出文档标题
    /// - `styles`: 第一份归档携带的样式表内容
    /// - `total_archives`: 成功处理的归档总数（频率标注的分母）
    pub fn render(
        &self,
        entries: &[ReconciledEntry],
        assets: &AssetMap,
        header: Option<&str>,
        title: &str,
        styles: &str,
        total_archives: usize,
    ) -> String {
        let mut doc = String::with_capacity(4096);
        doc.push_str("<html><head><title>");
        doc.push_str(&escape_html(title));
        doc.push_str("</title>");

        if !styles.trim().is_empty() {
            doc.push_str("<style>");
            doc.push_str(styles);
            doc.push_str("</style>");
        }

        doc.push_str("</head><body>");

        if let Some(header_html) = header {
            doc.push_str(&self.replace_heading_text(header_html, title));
        }

        doc.push_str("<section>");

        let mut next_number = 1;
        for entry in entries {
            doc.push_str(&self.render_fragment(entry, &mut next_number, assets, total_archives));
        }

        doc.push_str("</section></body></html>");
        doc
    }

    /// 渲染单个片段：编号 → 图片重链 → 频率标注
    fn render_fragment(
        &self,
        entry: &ReconciledEntry,
        next_number: &mut usize,
        assets: &AssetMap,
        total_archives: usize,
    ) -> String {
        let mut html = entry.fragment.html.clone();

        // 重写编号标记内的第一段数字文本；缺失时保持原样输出
        if self.qno_pattern.is_match(&html) {
            let number = *next_number;
            html = self
                .qno_pattern
                .replace(&html, |caps: &regex::Captures| {
                    format!("{}{}", &caps[1], number)
                })
                .into_owned();
            *next_number += 1;
        } else {
            warn!(
                "题目缺少编号标记，未编号输出: {}",
                crate::utils::logging::truncate_text(&entry.fragment.question_text, 40)
            );
        }

        html = self.relink_images(&html, assets);

        if self.show_frequency && total_archives > 0 {
            html = self.inject_frequency(&html, entry.occurrences, total_archives);
        }

        html
    }

    /// 把与资源映射精确匹配的图片引用改写为 data URI
    ///
    /// 不匹配的引用保持原样（在查看器中可能 404，可接受）
    fn relink_images(&self, html: &str, assets: &AssetMap) -> String {
        self.img_src_pattern
            .replace_all(html, |caps: &regex::Captures| {
                let src = &caps[2];
                match assets.get(src) {
                    Some(asset) => format!("{}{}{}", &caps[1], asset.to_data_uri(), &caps[3]),
                    None => {
                        debug!("图片引用无对应资源，保持原样: {}", src);
                        caps[0].to_string()
                    }
                }
            })
            .into_owned()
    }

    /// 在片段的信息区域内注入出现频率标注
    fn inject_frequency(&self, html: &str, occurrences: usize, total_archives: usize) -> String {
        let Some(m) = self.info_pattern.find(html) else {
            debug!("片段缺少信息区域，跳过频率标注");
            return html.to_string();
        };

        let percent = 100.0 * occurrences as f64 / total_archives as f64;
        let annotation = format!(
            r#"<div class="frequency">Frequency: {}/{} ({:.0}%)</div>"#,
            occurrences, total_archives, percent
        );

        let mut result = String::with_capacity(html.len() + annotation.len());
        result.push_str(&html[..m.end()]);
        result.push_str(&annotation);
        result.push_str(&html[m.end()..]);
        result
    }

    /// 把页眉内第一个标题元素的文本替换为输出标题
    fn replace_heading_text(&self, header_html: &str, title: &str) -> String {
        let escaped = escape_html(title);
        self.heading_pattern
            .replace(header_html, |caps: &regex::Captures| {
                format!("{}{}{}", &caps[1], escaped, &caps[2])
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssetPayload, QuestionFragment, Verdict};
    use std::collections::HashMap;

    fn renderer() -> DocumentRenderer {
        DocumentRenderer::new(&Config::default())
    }

    fn entry(html: &str, text: &str, occurrences: usize) -> ReconciledEntry {
        ReconciledEntry {
            fragment: QuestionFragment {
                html: html.to_string(),
                question_text: text.to_string(),
                verdict: Verdict::Correct,
                source_archive: 1,
            },
            occurrences,
        }
    }

    #[test]
    fn test_numbering_is_consecutive() {
        let entries = vec![
            entry(
                r#"<div class="que"><span class="rui-qno">7</span><div class="qtext">A</div></div>"#,
                "A",
                1,
            ),
            entry(
                r#"<div class="que"><span class="rui-qno">3</span><div class="qtext">B</div></div>"#,
                "B",
                1,
            ),
        ];
        let doc = renderer().render(&entries, &HashMap::new(), None, "T", "", 1);
        assert!(doc.contains(r#"<span class="rui-qno">1</span>"#));
        assert!(doc.contains(r#"<span class="rui-qno">2</span>"#));
        assert!(!doc.contains(r#"<span class="rui-qno">7</span>"#));
    }

    #[test]
    fn test_fragment_without_marker_is_kept_unnumbered() {
        let entries = vec![
            entry(r#"<div class="que"><div class="qtext">A</div></div>"#, "A", 1),
            entry(
                r#"<div class="que"><span class="rui-qno">9</span><div class="qtext">B</div></div>"#,
                "B",
                1,
            ),
        ];
        let doc = renderer().render(&entries, &HashMap::new(), None, "T", "", 1);
        // 缺少标记的片段不消耗编号
        assert!(doc.contains(r#"<span class="rui-qno">1</span>"#));
    }

    #[test]
    fn test_image_relinking_exact_match_only() {
        let mut assets: AssetMap = HashMap::new();
        assets.insert(
            "https://example.org/img/a.png".to_string(),
            AssetPayload {
                base64: "AAAA".to_string(),
                subtype: "png".to_string(),
            },
        );
        let entries = vec![entry(
            r#"<div class="que"><div class="qtext">A</div><img src="https://example.org/img/a.png"><img src="https://example.org/img/missing.png"></div>"#,
            "A",
            1,
        )];
        let doc = renderer().render(&entries, &assets, None, "T", "", 1);
        assert!(doc.contains(r#"src="data:image/png;base64,AAAA""#));
        assert!(doc.contains(r#"src="https://example.org/img/missing.png""#));
    }

    #[test]
    fn test_frequency_annotation() {
        let entries = vec![entry(
            r#"<div class="que"><div class="info"><span class="rui-qno">1</span></div><div class="qtext">A</div></div>"#,
            "A",
            2,
        )];
        let doc = renderer().render(&entries, &HashMap::new(), None, "T", "", 3);
        assert!(doc.contains("Frequency: 2/3 (67%)"));
    }

    #[test]
    fn test_header_heading_replaced_with_title() {
        let header = r#"<div class="wrapper-header"><h1>Old title</h1></div>"#;
        let entries = vec![];
        let doc = renderer().render(&entries, &HashMap::new(), Some(header), "New & Shiny", "", 0);
        assert!(doc.contains("<h1>New &amp; Shiny</h1>"));
        assert!(!doc.contains("Old title"));
    }

    #[test]
    fn test_styles_carried_into_head() {
        let doc = renderer().render(&[], &HashMap::new(), None, "T", ".que{margin:1em;}", 0);
        assert!(doc.contains("<style>.que{margin:1em;}</style>"));
    }
}
