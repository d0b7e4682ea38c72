use crate::models::verdict::Verdict;

/// 题目片段
///
/// 代表一份归档中的一个题目子树，携带判定结果和身份文本
#[derive(Debug, Clone)]
pub struct QuestionFragment {
    /// 片段的完整 HTML
    pub html: String,
    /// 题干文本（空白折叠后，作为跨归档去重的身份键）
    pub question_text: String,
    /// 判定结果
    pub verdict: Verdict,
    /// 来源归档编号（从 1 开始，用于日志）
    pub source_archive: usize,
}

/// 合并结果条目
///
/// 每个不同题干对应一条，保存胜出片段和出现次数
#[derive(Debug, Clone)]
pub struct ReconciledEntry {
    /// 胜出的题目片段（所有同题干片段中判定优先级最高者）
    pub fragment: QuestionFragment,
    /// 该题干在所有归档中出现的总次数（与胜负无关）
    pub occurrences: usize,
}
