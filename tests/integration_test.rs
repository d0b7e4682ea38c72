//! 端到端集成测试
//!
//! 用临时目录中的合成 MHTML 归档驱动完整流水线

use quiz_consolidator::services::{DocumentRenderer, FragmentExtractor, Reconciler};
use quiz_consolidator::{discover_archives, read_archive, AssetMap, Config, Verdict};
use scraper::Html;
use std::collections::HashMap;
use std::path::Path;

const BOUNDARY: &str = "----MultipartBoundary--quiz";

/// 构造单个 MHTML 归档：一个 HTML 部分加零或多个图片部分
fn build_mhtml(html: &str, images: &[(&str, &str)]) -> String {
    let mut parts = String::new();
    parts.push_str(&format!(
        "--{}\r\nContent-Type: text/html; charset=\"utf-8\"\r\nContent-Location: https://moodle.example.org/mod/quiz/review.php\r\n\r\n{}\r\n",
        BOUNDARY, html
    ));
    for (location, payload_b64) in images {
        parts.push_str(&format!(
            "--{}\r\nContent-Type: image/png\r\nContent-Transfer-Encoding: base64\r\nContent-Location: {}\r\n\r\n{}\r\n",
            BOUNDARY, location, payload_b64
        ));
    }
    parts.push_str(&format!("--{}--\r\n", BOUNDARY));

    format!(
        "From: <Saved by Blink>\r\nSubject: Quiz review\r\nMIME-Version: 1.0\r\nContent-Type: multipart/related; type=\"text/html\"; boundary=\"{}\"\r\n\r\n{}",
        BOUNDARY, parts
    )
}

/// 构造一道题目的 div.que 子树
///
/// `attempt_tag` 用于区分同一题目来自哪份归档
fn question_div(qtext: &str, qno: u32, grade: Option<&str>, attempt_tag: &str, img: Option<&str>) -> String {
    let grade_div = grade
        .map(|g| format!(r#"<div class="grade">{}</div>"#, g))
        .unwrap_or_default();
    let img_tag = img
        .map(|src| format!(r#"<img src="{}">"#, src))
        .unwrap_or_default();
    format!(
        r#"<div class="que multichoice"><div class="info"><span class="rui-qno">{}</span>{}</div><div class="qtext">{}</div><div class="attempt">{}</div>{}</div>"#,
        qno, grade_div, qtext, attempt_tag, img_tag
    )
}

/// 构造测验回顾页面的完整 HTML
fn quiz_page(questions: &[String]) -> String {
    format!(
        r#"<html><head><style>.que {{ margin: 8px; }}</style></head><body><div class="wrapper-header"><h2>Data  Structures
        Quiz</h2></div>{}</body></html>"#,
        questions.join("")
    )
}

/// 运行收集 → 合并 → 渲染流水线，返回最终文档
async fn run_pipeline(paths: &[std::path::PathBuf]) -> String {
    let extractor = FragmentExtractor::new();
    let mut reconciler = Reconciler::new();
    let mut assets: AssetMap = HashMap::new();
    let mut carried_header = None;
    let mut carried_title = String::new();
    let mut carried_styles = String::new();
    let mut processed = 0;

    for (idx, path) in paths.iter().enumerate() {
        let content = read_archive(path).await.expect("读取归档失败");
        for (key, payload) in content.assets.iter() {
            assets.entry(key.clone()).or_insert_with(|| payload.clone());
        }
        let body = content.body.expect("归档缺少 HTML 部分");
        if processed == 0 {
            carried_header = content.header.clone();
            carried_title = content.title.clone().unwrap_or_default();
            carried_styles = content.styles.clone();
        }
        let document = Html::parse_document(&body);
        for fragment in extractor.extract(&document, idx + 1) {
            reconciler.merge(fragment);
        }
        processed += 1;
    }

    let entries = reconciler.into_entries();
    let renderer = DocumentRenderer::new(&Config::default());
    renderer.render(
        &entries,
        &assets,
        carried_header.as_deref(),
        &carried_title,
        &carried_styles,
        processed,
    )
}

#[tokio::test]
async fn test_reader_extracts_all_archive_parts() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let image_location = "https://moodle.example.org/pluginfile/diagram.png";
    let image_b64 = "iVBORw0KGgo=";

    let html = quiz_page(&[question_div(
        "What is a stack?",
        3,
        Some("Mark 1.00 out of 1.00"),
        "attempt1",
        Some(image_location),
    )]);
    let path = dir.path().join("attempt1.mhtml");
    std::fs::write(&path, build_mhtml(&html, &[(image_location, image_b64)])).unwrap();

    let content = read_archive(&path).await.expect("读取归档失败");

    // 标题：页眉内首个标题元素，空白折叠
    assert_eq!(content.title.as_deref(), Some("Data Structures Quiz"));

    // 页眉单独携带且已从正文移除
    let header = content.header.expect("应提取到页眉");
    assert!(header.contains("wrapper-header"));
    let body = content.body.expect("应提取到正文");
    assert!(!body.contains("wrapper-header"));
    assert!(body.contains("What is a stack?"));

    // 样式表来自 style 标签
    assert!(content.styles.contains(".que { margin: 8px; }"));

    // 资源映射按 Content-Location 收录，载荷为 base64
    let asset = content.assets.get(image_location).expect("应收录图片资源");
    assert_eq!(asset.subtype, "png");
    assert_eq!(asset.base64, image_b64);
}

#[tokio::test]
async fn test_unreadable_archive_is_an_error_not_a_panic() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.mhtml");
    assert!(read_archive(&missing).await.is_err());
}

#[tokio::test]
async fn test_end_to_end_three_archives() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let image_location = "https://moodle.example.org/pluginfile/qa.png";
    let image_b64 = "iVBORw0KGgo=";

    // 归档 1: A 错误、B 正确
    let a1 = quiz_page(&[
        question_div("Question A", 1, Some("Mark 0.00 out of 1.00"), "attempt1", Some(image_location)),
        question_div("Question B", 2, Some("Mark 1.00 out of 1.00"), "attempt1", None),
    ]);
    // 归档 2: A 正确
    let a2 = quiz_page(&[question_div(
        "Question A",
        1,
        Some("Mark 1.00 out of 1.00"),
        "attempt2",
        Some(image_location),
    )]);
    // 归档 3: A 错误、C 无评分文本
    let a3 = quiz_page(&[
        question_div("Question A", 1, Some("Mark 0.00 out of 1.00"), "attempt3", None),
        question_div("Question C", 2, None, "attempt3", None),
    ]);

    std::fs::write(dir.path().join("a1.mhtml"), build_mhtml(&a1, &[(image_location, image_b64)])).unwrap();
    std::fs::write(dir.path().join("a2.mhtml"), build_mhtml(&a2, &[])).unwrap();
    std::fs::write(dir.path().join("a3.mhtml"), build_mhtml(&a3, &[])).unwrap();

    let paths = discover_archives(dir.path().to_str().unwrap(), false).unwrap();
    assert_eq!(paths.len(), 3);

    // 先单独校验合并语义
    let extractor = FragmentExtractor::new();
    let mut reconciler = Reconciler::new();
    for (idx, path) in paths.iter().enumerate() {
        let content = read_archive(path).await.unwrap();
        let document = Html::parse_document(content.body.as_deref().unwrap());
        for fragment in extractor.extract(&document, idx + 1) {
            reconciler.merge(fragment);
        }
    }
    let entries = reconciler.into_entries();

    // 输出顺序 = 首见顺序 A、B、C
    let order: Vec<_> = entries.iter().map(|e| e.fragment.question_text.as_str()).collect();
    assert_eq!(order, vec!["Question A", "Question B", "Question C"]);

    // A 的胜出片段来自归档 2（判定升级），出现 3 次
    assert_eq!(entries[0].fragment.verdict, Verdict::Correct);
    assert_eq!(entries[0].occurrences, 3);
    assert!(entries[0].fragment.html.contains("attempt2"));

    assert_eq!(entries[1].fragment.verdict, Verdict::Correct);
    assert_eq!(entries[1].occurrences, 1);

    // 评分缺失回退为错误
    assert_eq!(entries[2].fragment.verdict, Verdict::Incorrect);
    assert_eq!(entries[2].occurrences, 1);

    // 再校验渲染后的最终文档
    let doc = run_pipeline(&paths).await;

    // 连续编号 1..3
    assert!(doc.contains(r#"<span class="rui-qno">1</span>"#));
    assert!(doc.contains(r#"<span class="rui-qno">2</span>"#));
    assert!(doc.contains(r#"<span class="rui-qno">3</span>"#));

    // 频率标注（3 份归档全部成功处理）
    assert!(doc.contains("Frequency: 3/3 (100%)"));
    assert!(doc.contains("Frequency: 1/3 (33%)"));

    // 图片重链为自包含 data URI
    assert!(doc.contains(&format!("data:image/png;base64,{}", image_b64)));
    assert!(!doc.contains(&format!(r#"src="{}""#, image_location)));

    // 标题与页眉携带
    assert!(doc.contains("<title>Data Structures Quiz</title>"));
    assert!(doc.contains("wrapper-header"));

    // 文档骨架
    assert!(doc.starts_with("<html><head>"));
    assert!(doc.contains("<section>"));
    assert!(doc.ends_with("</section></body></html>"));
}

#[tokio::test]
async fn test_pipeline_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let html = quiz_page(&[
        question_div("Question A", 1, Some("Mark 0.50 out of 1.00"), "attempt1", None),
        question_div("Question B", 2, Some("Mark 1.00 out of 1.00"), "attempt1", None),
    ]);
    std::fs::write(dir.path().join("only.mhtml"), build_mhtml(&html, &[])).unwrap();

    let paths = discover_archives(dir.path().to_str().unwrap(), false).unwrap();
    let first = run_pipeline(&paths).await;
    let second = run_pipeline(&paths).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_asset_merge_is_first_seen_wins() {
    let dir = tempfile::tempdir().unwrap();
    let location = "https://moodle.example.org/pluginfile/shared.png";

    let html = quiz_page(&[question_div(
        "Question A",
        1,
        Some("Mark 1.00 out of 1.00"),
        "attempt",
        Some(location),
    )]);
    std::fs::write(dir.path().join("a1.mhtml"), build_mhtml(&html, &[(location, "Zmlyc3Q=")])).unwrap();
    std::fs::write(dir.path().join("a2.mhtml"), build_mhtml(&html, &[(location, "c2Vjb25k")])).unwrap();

    let paths = discover_archives(dir.path().to_str().unwrap(), false).unwrap();
    let doc = run_pipeline(&paths).await;

    // 键冲突时保留先到归档的载荷
    assert!(doc.contains("base64,Zmlyc3Q="));
    assert!(!doc.contains("base64,c2Vjb25k"));
}

#[tokio::test]
async fn test_corrupt_archive_does_not_poison_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a0.mhtml"), "this is not a mime message at all").unwrap();
    let html = quiz_page(&[question_div(
        "Question A",
        1,
        Some("Mark 1.00 out of 1.00"),
        "attempt",
        None,
    )]);
    std::fs::write(dir.path().join("a1.mhtml"), build_mhtml(&html, &[])).unwrap();

    let paths = discover_archives(dir.path().to_str().unwrap(), false).unwrap();

    let mut good = 0;
    for path in &paths {
        match read_archive(path).await {
            Ok(content) if content.body.is_some() => good += 1,
            _ => {}
        }
    }
    assert_eq!(good, 1);
}

#[test]
fn test_missing_folder_is_a_configuration_error() {
    assert!(discover_archives("/definitely/not/here", false).is_err());
}

// 确认输出路径辅助逻辑与标题解析一致
#[test]
fn test_sanitized_output_name_from_title() {
    let name = quiz_consolidator::utils::filename::sanitize_basename(
        "Data Structures Quiz: Attempt review",
        "Consolidated_Assessment",
    );
    assert_eq!(name, "Data Structures Quiz Attempt review");
    assert!(Path::new(&format!("{}.html", name)).extension().is_some());
}
