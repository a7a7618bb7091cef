/// 题型在目标平台的支持程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionSupport {
    /// 完整支持
    Full,
    /// 部分支持，导入后需人工检查
    Limited,
    /// 不支持
    Unsupported,
}

impl InteractionSupport {
    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            InteractionSupport::Full => "full",
            InteractionSupport::Limited => "limited",
            InteractionSupport::Unsupported => "unsupported",
        }
    }

    /// 从名称解析
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "full" => Some(InteractionSupport::Full),
            "limited" => Some(InteractionSupport::Limited),
            "unsupported" => Some(InteractionSupport::Unsupported),
            _ => None,
        }
    }
}

impl std::fmt::Display for InteractionSupport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
