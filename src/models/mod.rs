//! 数据模型模块

pub mod asset;
pub mod fragment;
pub mod verdict;

pub use asset::{AssetMap, AssetPayload};
pub use fragment::{QuestionFragment, ReconciledEntry};
pub use verdict::Verdict;
