use serde::{Deserialize, Serialize};

/// 未识别的题型标签
pub const UNKNOWN_INTERACTION: &str = "unknown";

/// 引用外部文件的题目标签（题目正文不在当前文档中）
pub const REFERENCED_ITEM: &str = "Referenced Item";

/// 默认分值
pub const DEFAULT_POINTS: f64 = 1.0;

/// 提取出的单个题目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub title: Option<String>,
    /// 题型标签，如 "Multiple Choice"
    pub interaction_type: String,
    pub points: f64,
    pub has_feedback: bool,
    pub has_media: bool,
    /// 被引用题目的文件路径（仅 Referenced Item）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl Default for Question {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: None,
            interaction_type: UNKNOWN_INTERACTION.to_string(),
            points: DEFAULT_POINTS,
            has_feedback: false,
            has_media: false,
            href: None,
        }
    }
}

impl Question {
    /// 创建引用题目，分值取默认值
    pub fn referenced(id: impl Into<String>, href: Option<String>) -> Self {
        Self {
            id: id.into(),
            interaction_type: REFERENCED_ITEM.to_string(),
            href,
            ..Default::default()
        }
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.title {
            Some(title) => write!(f, "{} ({}) [{}, {} 分]", self.id, title, self.interaction_type, self.points),
            None => write!(f, "{} [{}, {} 分]", self.id, self.interaction_type, self.points),
        }
    }
}
