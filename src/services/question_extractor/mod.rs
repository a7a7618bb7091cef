//! 题目提取服务 - 业务能力层
//!
//! 按版本标签分派到两个独立的遍历器，输出同一种 `Question` 列表：
//! - `legacy` - QTI 1.2（item / section）
//! - `modern` - QTI 2.1（assessmentItem / assessmentTest 递归）

pub mod legacy;
pub mod modern;

use crate::models::{ParsedDocument, Question, SchemaVersion, XmlNode};
use tracing::debug;

/// 媒体特征（同时匹配转义后的 HTML）
const MEDIA_FINGERPRINTS: &[&str] = &[
    "<img",
    "<object",
    "<audio",
    "<video",
    "<matimage",
    "<mataudio",
    "<matvideo",
    "&lt;img",
    "&lt;object",
    "&lt;audio",
    "&lt;video",
];

/// 提取选项
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// 嵌套 section 的最大深度，None 表示不限制
    pub max_section_depth: Option<usize>,
}

/// 提取题目列表
pub fn extract_questions(doc: &ParsedDocument, options: &ExtractOptions) -> Vec<Question> {
    if !doc.well_formed {
        return Vec::new();
    }

    let questions = match doc.schema_version {
        SchemaVersion::V1_2 => legacy::extract(&doc.tree),
        SchemaVersion::V2_1 => modern::extract(&doc.tree, options),
    };

    debug!("{} 文档提取到 {} 道题", doc.schema_version, questions.len());
    questions
}

/// 节点序列化后是否包含媒体特征
///
/// 纯文本匹配，题干中恰好出现这些字符串也会命中
pub fn has_media(node: &XmlNode) -> bool {
    let markup = node.to_markup();
    MEDIA_FINGERPRINTS.iter().any(|fp| markup.contains(fp))
}

/// 解析分值，无法解析或为负数时返回 None
pub(crate) fn parse_points(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|points| points.is_finite() && *points >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::document_parser::{parse_document, ParseOptions};

    #[test]
    fn test_has_media_matches_escaped_html() {
        let doc = parse_document(
            "<item><mattext>&lt;p&gt;&lt;img src=\"a.png\"&gt;&lt;/p&gt;</mattext></item>",
            &ParseOptions::default(),
        );
        assert!(has_media(&doc.tree));

        let doc = parse_document("<item><mattext>plain</mattext></item>", &ParseOptions::default());
        assert!(!has_media(&doc.tree));
    }

    #[test]
    fn test_parse_points() {
        assert_eq!(parse_points(" 2.5 "), Some(2.5));
        assert_eq!(parse_points("abc"), None);
        assert_eq!(parse_points("-1"), None);
        assert_eq!(parse_points("NaN"), None);
    }

    #[test]
    fn test_malformed_document_has_no_questions() {
        let doc = parse_document("<questestinterop>", &ParseOptions::default());
        assert!(extract_questions(&doc, &ExtractOptions::default()).is_empty());
    }
}
