//! 跨归档合并服务 - 业务能力层
//!
//! 以题干文本为身份键，对所有归档收集到的片段做确定性归并：
//! 判定优先级严格更高者替换，平局保留先到者

use crate::models::{QuestionFragment, ReconciledEntry, Verdict};
use std::collections::HashMap;
use tracing::debug;

/// 合并引擎
///
/// 输出顺序 = 各键首次出现的顺序，给定固定输入顺序时结果确定
pub struct Reconciler {
    entries: HashMap<String, ReconciledEntry>,
    /// 键的首见顺序
    order: Vec<String>,
}

impl Reconciler {
    /// 创建新的合并引擎
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// 归并单个片段（显式归并函数，而非迭代副作用）
    ///
    /// 规则：
    /// - 新键：插入条目，出现次数置 1
    /// - 已有键：出现次数 +1；仅当新片段判定优先级严格更高时替换存储片段
    pub fn merge(&mut self, fragment: QuestionFragment) {
        match self.entries.get_mut(&fragment.question_text) {
            None => {
                self.order.push(fragment.question_text.clone());
                self.entries.insert(
                    fragment.question_text.clone(),
                    ReconciledEntry {
                        fragment,
                        occurrences: 1,
                    },
                );
            }
            Some(entry) => {
                entry.occurrences += 1;
                if fragment.verdict.priority() > entry.fragment.verdict.priority() {
                    debug!(
                        "题目判定升级: {} → {} ({})",
                        entry.fragment.verdict,
                        fragment.verdict,
                        crate::utils::logging::truncate_text(&fragment.question_text, 40)
                    );
                    entry.fragment = fragment;
                }
            }
        }
    }

    /// 已归并的不同题目数量
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// 各判定等级的题目数量统计（用于最终日志）
    pub fn verdict_breakdown(&self) -> (usize, usize, usize) {
        let mut correct = 0;
        let mut partial = 0;
        let mut incorrect = 0;
        for entry in self.entries.values() {
            match entry.fragment.verdict {
                Verdict::Correct => correct += 1,
                Verdict::PartiallyCorrect => partial += 1,
                Verdict::Incorrect | Verdict::Unknown => incorrect += 1,
            }
        }
        (correct, partial, incorrect)
    }

    /// 按首见顺序取出全部合并条目
    pub fn into_entries(mut self) -> Vec<ReconciledEntry> {
        self.order
            .iter()
            .filter_map(|key| self.entries.remove(key))
            .collect()
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}
