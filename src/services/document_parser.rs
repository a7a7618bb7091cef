//! 文档解析服务 - 业务能力层
//!
//! 只负责"把标记文本变成带版本标签的树"：
//! 1. 先检查格式是否良好（单一根元素、标签闭合、根外无文本）
//! 2. 再按特征字符串判断 QTI 版本

use crate::error::{AnalysisError, AnalysisResult};
use crate::models::{ParsedDocument, SchemaVersion, XmlNode};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, warn};

/// 规范中可重复的元素，解析时始终保存为列表
pub const DEFAULT_LIST_ELEMENTS: &[&str] = &[
    // QTI 1.2
    "assessment",
    "section",
    "item",
    "response_label",
    "respcondition",
    "itemfeedback",
    "decvar",
    "flow",
    // QTI 2.1
    "testPart",
    "assessmentSection",
    "assessmentItemRef",
    "assessmentItem",
    "simpleChoice",
    "inlineChoice",
    "simpleAssociableChoice",
    "choiceInteraction",
    "textEntryInteraction",
    "extendedTextInteraction",
    "matchInteraction",
    "orderInteraction",
    "inlineChoiceInteraction",
    "hotspotInteraction",
    "gapMatchInteraction",
    "associateInteraction",
    "sliderInteraction",
    "uploadInteraction",
    "graphicGapMatchInteraction",
    "drawingInteraction",
    "mediaInteraction",
    "customInteraction",
    "modalFeedback",
    "outcomeDeclaration",
    "responseDeclaration",
    "responseCondition",
    "value",
    // imsmanifest.xml
    "resource",
    "file",
    "dependency",
];

/// 旧版特征（优先检查）
const LEGACY_MARKERS: &[&str] = &["<questestinterop", "ims_qtiasiv1p2"];

/// 新版特征
const MODERN_MARKERS: &[&str] = &["<assessmentTest", "<assessmentItem", "imsqti_v2p1", "imsqti_v2p2"];

/// 解析选项
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// 始终规整为列表的元素名
    pub list_elements: &'static [&'static str],
    /// 是否去掉文本首尾空白
    pub trim_text: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            list_elements: DEFAULT_LIST_ELEMENTS,
            trim_text: true,
        }
    }
}

/// 解析文档
///
/// 格式错误时不会猜测树结构：返回 `well_formed = false` 和空树
pub fn parse_document(raw: &str, options: &ParseOptions) -> ParsedDocument {
    match try_parse_document(raw, options) {
        Ok(doc) => doc,
        Err(e) => {
            warn!("⚠️ 文档格式错误: {}", e);
            ParsedDocument {
                schema_version: SchemaVersion::V2_1,
                tree: XmlNode::default(),
                well_formed: false,
                parse_errors: vec![e.to_string()],
            }
        }
    }
}

/// 解析文档，格式错误时直接返回错误（分析流程使用）
pub fn try_parse_document(raw: &str, options: &ParseOptions) -> AnalysisResult<ParsedDocument> {
    let tree = build_tree(raw, options)?;
    let schema_version = detect_version(raw, &tree.name);
    debug!("根元素 <{}>，识别为 {}", tree.name, schema_version);

    Ok(ParsedDocument {
        schema_version,
        tree,
        well_formed: true,
        parse_errors: Vec::new(),
    })
}

/// 判断 QTI 版本
///
/// 按优先级匹配：旧版特征 → 新版特征 → 默认新版。
/// 同时包含两种特征时判为旧版。
pub fn detect_version(raw: &str, root_name: &str) -> SchemaVersion {
    if root_name == "questestinterop" || LEGACY_MARKERS.iter().any(|m| raw.contains(m)) {
        return SchemaVersion::V1_2;
    }

    if matches!(root_name, "assessmentTest" | "assessmentItem")
        || MODERN_MARKERS.iter().any(|m| raw.contains(m))
    {
        return SchemaVersion::V2_1;
    }

    debug!("未找到版本特征 (根元素 <{}>)，按 QTI 2.1 处理", root_name);
    SchemaVersion::V2_1
}

/// 构建节点树
fn build_tree(raw: &str, options: &ParseOptions) -> AnalysisResult<XmlNode> {
    let raw = raw.trim_start_matches('\u{feff}');
    let mut reader = Reader::from_str(raw);
    reader.config_mut().trim_text(options.trim_text);

    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        let position = reader.buffer_position() as u64;
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                ensure_single_root(&root, &stack, position)?;
                stack.push(open_element(&e, position)?);
            }
            Ok(Event::Empty(e)) => {
                ensure_single_root(&root, &stack, position)?;
                let node = open_element(&e, position)?;
                attach(node, &mut stack, &mut root, options);
            }
            Ok(Event::End(_)) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| AnalysisError::malformed_at("多余的结束标签", position))?;
                attach(node, &mut stack, &mut root, options);
            }
            Ok(Event::Text(t)) => {
                let text = t
                    .unescape()
                    .map_err(|e| AnalysisError::malformed_at(e.to_string(), position))?;
                append_text(&mut stack, &text, position)?;
            }
            Ok(Event::CData(c)) => {
                let inner = c.into_inner();
                let text = String::from_utf8_lossy(&inner);
                append_text(&mut stack, &text, position)?;
            }
            Ok(Event::Eof) => break,
            // 声明、注释、处理指令、DOCTYPE 不进入树
            Ok(_) => {}
            Err(e) => {
                return Err(AnalysisError::malformed_at(
                    e.to_string(),
                    reader.error_position() as u64,
                ));
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(AnalysisError::malformed(format!("元素 <{}> 未闭合", open.name)));
    }

    root.ok_or_else(|| AnalysisError::malformed("文档中没有根元素"))
}

fn ensure_single_root(root: &Option<XmlNode>, stack: &[XmlNode], position: u64) -> AnalysisResult<()> {
    if root.is_some() && stack.is_empty() {
        return Err(AnalysisError::malformed_at("文档包含多个根元素", position));
    }
    Ok(())
}

fn open_element(e: &BytesStart<'_>, position: u64) -> AnalysisResult<XmlNode> {
    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
    let mut node = XmlNode::new(name);

    for attr in e.attributes() {
        let attr = attr.map_err(|err| {
            AnalysisError::malformed_at(format!("<{}> 属性错误: {}", node.name, err), position)
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| AnalysisError::malformed_at(err.to_string(), position))?
            .into_owned();
        node.attributes.insert(key, value);
    }

    Ok(node)
}

fn attach(node: XmlNode, stack: &mut [XmlNode], root: &mut Option<XmlNode>, options: &ParseOptions) {
    match stack.last_mut() {
        Some(parent) => parent.push_child(node, options.list_elements),
        None => *root = Some(node),
    }
}

fn append_text(stack: &mut [XmlNode], text: &str, position: u64) -> AnalysisResult<()> {
    match stack.last_mut() {
        Some(node) => {
            node.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(AnalysisError::malformed_at("根元素之外存在文本内容", position)),
    }
}
