use std::collections::HashMap;

/// 内嵌资源载荷
///
/// 以 base64 形式保存的二进制资源及其媒体子类型
#[derive(Debug, Clone)]
pub struct AssetPayload {
    /// base64 编码后的二进制内容
    pub base64: String,
    /// 媒体子类型（如 png、jpeg）
    pub subtype: String,
}

impl AssetPayload {
    /// 生成自包含的 data URI
    pub fn to_data_uri(&self) -> String {
        format!("data:image/{};base64,{}", self.subtype, self.base64)
    }
}

/// 资源映射：引用键（Content-Location）→ 资源载荷
///
/// 跨归档合并时先见者优先，键冲突保留先到的条目
pub type AssetMap = HashMap<String, AssetPayload>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_format() {
        let asset = AssetPayload {
            base64: "aGVsbG8=".to_string(),
            subtype: "png".to_string(),
        };
        assert_eq!(asset.to_data_uri(), "data:image/png;base64,aGVsbG8=");
    }
}
