/// 判定结果枚举
///
/// 优先级从高到低：完全正确 > 部分正确 > 错误 > 未知
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Verdict {
    /// 完全正确
    Correct = 3,
    /// 部分正确
    PartiallyCorrect = 2,
    /// 错误
    Incorrect = 1,
    /// 未知（保留值，优先级最低）
    Unknown = 0,
}

impl Verdict {
    /// 获取优先级数值
    pub fn priority(self) -> u8 {
        self as u8
    }

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            Verdict::Correct => "完全正确",
            Verdict::PartiallyCorrect => "部分正确",
            Verdict::Incorrect => "错误",
            Verdict::Unknown => "未知",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
