//! MHTML 归档读取模块
//!
//! 将单个 MHTML 容器文件解析为结构化内容：
//! 正文 HTML、资源映射、页眉 HTML、标题和样式表

use crate::error::AppError;
use crate::models::{AssetMap, AssetPayload};
use crate::utils::text::{collapse_whitespace, element_text};
use anyhow::Result;
use base64::{engine::general_purpose, Engine as _};
use mail_parser::{MessageParser, MimeHeaders};
use scraper::{Html, Selector};
use std::path::Path;
use tracing::{debug, warn};

/// 归档解析结果
///
/// 所有字段均为尽力提取：缺失的部分以 None/空值表示，不中断批处理
#[derive(Debug, Default)]
pub struct ArchiveContent {
    /// 正文 HTML（已移除页眉区域），归档中没有 HTML 部分时为 None
    pub body: Option<String>,
    /// 二进制资源映射（引用键 → base64 载荷）
    pub assets: AssetMap,
    /// 页眉区域 HTML
    pub header: Option<String>,
    /// 从页眉首个标题元素提取的文档标题
    pub title: Option<String>,
    /// 样式表内容（text/css 部分 + HTML 内 style 标签）
    pub styles: String,
}

/// 读取并解析单个 MHTML 归档文件
///
/// # 参数
/// - `path`: 归档文件路径
///
/// # 返回
/// 返回解析后的结构化内容；文件不可读或 MIME 容器无法解析时返回错误，
/// 由调用方记录日志并跳过该归档
pub async fn read_archive(path: &Path) -> Result<ArchiveContent> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::archive_read_failed(path.display().to_string(), e))?;

    let message = MessageParser::default()
        .parse(&bytes)
        .ok_or_else(|| AppError::mime_parse_failed(path.display().to_string()))?;

    let mut content = ArchiveContent::default();

    // 遍历所有 MIME 部分：第一个 HTML 部分为主文档，图片部分随处收集
    for part in message.parts.iter() {
        let Some(ctype) = part.content_type() else {
            continue;
        };
        let main_type = ctype.ctype();
        let sub_type = ctype.subtype().unwrap_or("");

        if main_type.eq_ignore_ascii_case("text") && sub_type.eq_ignore_ascii_case("html") {
            if content.body.is_none() {
                let html = match part.text_contents() {
                    Some(text) => text.to_string(),
                    None => String::from_utf8_lossy(part.contents()).to_string(),
                };
                parse_primary_html(&html, &mut content);
            } else {
                debug!("忽略多余的 HTML 部分");
            }
        } else if main_type.eq_ignore_ascii_case("text") && sub_type.eq_ignore_ascii_case("css") {
            if let Some(css) = part.text_contents() {
                content.styles.push_str(css);
                content.styles.push('\n');
            }
        } else if main_type.eq_ignore_ascii_case("image") {
            harvest_image(part, sub_type, &mut content.assets);
        }
    }

    if content.body.is_none() {
        warn!("归档中没有可用的 HTML 部分: {}", path.display());
    }

    Ok(content)
}

/// 解析主 HTML 部分
///
/// 提取页眉区域和标题（只读，不影响正文提取），
/// 并将页眉从正文字符串中移除
fn parse_primary_html(html: &str, content: &mut ArchiveContent) {
    let document = Html::parse_document(html);

    let style_selector = Selector::parse("style").unwrap();
    let body_selector = Selector::parse("body").unwrap();
    let header_selector = Selector::parse("div.wrapper-header").unwrap();
    let heading_selector = Selector::parse("h1, h2, h3, h4, h5, h6").unwrap();

    // 收集内联样式表
    for style in document.select(&style_selector) {
        content.styles.push_str(&style.text().collect::<Vec<_>>().join("\n"));
        content.styles.push('\n');
    }

    let Some(body) = document.select(&body_selector).next() else {
        // 没有 body 元素时整份 HTML 作为正文
        content.body = Some(html.to_string());
        return;
    };

    let mut body_html = body.html();

    if let Some(header) = body.select(&header_selector).next() {
        let header_html = header.html();

        // 标题取页眉内第一个标题元素的折叠文本
        if let Some(heading) = header.select(&heading_selector).next() {
            let title = element_text(&heading);
            if !title.is_empty() {
                content.title = Some(title);
            }
        }

        // 页眉单独携带，从正文中移除（两者出自同一序列化，子串移除是安全的）
        body_html = body_html.replacen(&header_html, "", 1);
        content.header = Some(header_html);
    }

    content.body = Some(body_html);
}

/// 收集单个图片部分到资源映射
///
/// 只有携带 Content-Location 引用键的部分才会被收录，
/// 没有引用键的部分无法被正文引用，直接丢弃
fn harvest_image(part: &mail_parser::MessagePart<'_>, sub_type: &str, assets: &mut AssetMap) {
    let Some(location) = part.content_location() else {
        warn!("图片部分缺少 Content-Location，已丢弃");
        return;
    };

    let key = collapse_whitespace(location);
    if key.is_empty() {
        warn!("图片部分的 Content-Location 为空，已丢弃");
        return;
    }

    let subtype = if sub_type.is_empty() { "png" } else { sub_type };
    let payload = AssetPayload {
        base64: general_purpose::STANDARD.encode(part.contents()),
        subtype: subtype.to_string(),
    };

    // 同一归档内引用键唯一，重复键保留先到者
    if assets.contains_key(&key) {
        debug!("重复的资源引用键，保留先到条目: {}", key);
        return;
    }

    debug!("收集资源: {} (image/{})", key, subtype);
    assets.insert(key, payload);
}
