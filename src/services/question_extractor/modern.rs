//! QTI 2.1 遍历器
//!
//! - 根元素为 assessmentItem：它就是唯一的题目
//! - 根元素为 assessmentTest：testPart → assessmentSection →（子 section | itemRef）任意深度，按文档顺序，
//!   每个 itemRef 生成一道 "Referenced Item"（题目正文在外部文件，不在这里加载）

use super::{has_media, parse_points, ExtractOptions};
use crate::models::question::{DEFAULT_POINTS, UNKNOWN_INTERACTION};
use crate::models::{Question, XmlNode};
use tracing::{debug, warn};

/// 交互标签 → 题型，按顺序匹配，先命中者优先
pub const INTERACTION_TYPES: &[(&str, &str)] = &[
    ("choiceInteraction", "Multiple Choice"),
    ("textEntryInteraction", "Fill in the Blank"),
    ("extendedTextInteraction", "Essay"),
    ("matchInteraction", "Matching"),
    ("orderInteraction", "Ordering"),
    ("inlineChoiceInteraction", "Multiple Dropdowns"),
    ("hotspotInteraction", "Hotspot"),
    ("gapMatchInteraction", "Gap Match"),
    ("associateInteraction", "Associate"),
    ("sliderInteraction", "Slider"),
    ("uploadInteraction", "File Upload"),
    ("graphicGapMatchInteraction", "Graphic Gap Match"),
    ("drawingInteraction", "Drawing"),
    ("mediaInteraction", "Media"),
    ("customInteraction", "Custom"),
];

pub fn extract(root: &XmlNode, options: &ExtractOptions) -> Vec<Question> {
    match root.name.as_str() {
        "assessmentItem" => vec![standalone_question(root)],
        "assessmentTest" => {
            let sections: Vec<&XmlNode> = root
                .children("testPart")
                .iter()
                .flat_map(|part| part.children("assessmentSection"))
                .collect();
            walk_sections(&sections, options)
        }
        other => {
            debug!("根元素 <{}> 不是 QTI 2.1 容器，没有题目", other);
            Vec::new()
        }
    }
}

/// section 遍历中的待处理节点
enum Visit<'a> {
    Section(&'a XmlNode, usize),
    ItemRef(&'a XmlNode),
}

/// 按文档顺序遍历 section 树（显式栈，任意深度）
fn walk_sections(top_level: &[&XmlNode], options: &ExtractOptions) -> Vec<Question> {
    let mut out = Vec::new();
    let mut stack: Vec<Visit<'_>> = top_level
        .iter()
        .rev()
        .map(|&section| Visit::Section(section, 1))
        .collect();

    while let Some(visit) = stack.pop() {
        let (section, depth) = match visit {
            Visit::ItemRef(item_ref) => {
                let position = out.len() + 1;
                out.push(referenced_question(item_ref, position));
                continue;
            }
            Visit::Section(section, depth) => (section, depth),
        };

        if let Some(limit) = options.max_section_depth {
            if depth > limit {
                warn!(
                    "⚠️ section {} 嵌套深度 {} 超过上限 {}，已跳过",
                    section.attr("identifier").unwrap_or("?"),
                    depth,
                    limit
                );
                continue;
            }
        }

        let children: Vec<Visit<'_>> = section
            .ordered_children()
            .into_iter()
            .filter_map(|child| match child.name.as_str() {
                "assessmentItemRef" => Some(Visit::ItemRef(child)),
                "assessmentSection" => Some(Visit::Section(child, depth + 1)),
                _ => None,
            })
            .collect();
        stack.extend(children.into_iter().rev());
    }

    out
}

fn referenced_question(item_ref: &XmlNode, position: usize) -> Question {
    let id = item_ref
        .attr("identifier")
        .map(str::to_string)
        .unwrap_or_else(|| format!("item_ref_{}", position));

    Question {
        has_media: has_media(item_ref),
        ..Question::referenced(id, item_ref.attr("href").map(str::to_string))
    }
}

fn standalone_question(item: &XmlNode) -> Question {
    let body_markup = item
        .child("itemBody")
        .map(XmlNode::to_markup)
        .unwrap_or_else(|| item.to_markup());

    // responseProcessing 写法差异很大，这里只做子串匹配
    let has_feedback = item.has_child("modalFeedback")
        || item
            .child("responseProcessing")
            .map(|rp| rp.to_markup().contains("feedback"))
            .unwrap_or(false);

    Question {
        id: item
            .attr("identifier")
            .map(str::to_string)
            .unwrap_or_else(|| "item_1".to_string()),
        title: item.attr("title").map(str::to_string),
        interaction_type: detect_interaction(&body_markup).to_string(),
        points: max_score(item),
        has_feedback,
        has_media: has_media(item),
        href: None,
    }
}

/// 在序列化的题干中查找交互标签
pub fn detect_interaction(body_markup: &str) -> &'static str {
    INTERACTION_TYPES
        .iter()
        .find(|(tag, _)| body_markup.contains(tag))
        .map(|&(_, label)| label)
        .unwrap_or(UNKNOWN_INTERACTION)
}

/// 读取满分：MAXSCORE 默认值 → SCORE 的 normalMaximum → 默认 1 分
fn max_score(item: &XmlNode) -> f64 {
    let declarations = item.children("outcomeDeclaration");
    let find = |identifier: &str| {
        declarations
            .iter()
            .find(|decl| decl.attr("identifier") == Some(identifier))
    };

    find("MAXSCORE")
        .and_then(|decl| decl.child("defaultValue"))
        .and_then(|default| default.child("value"))
        .and_then(|value| parse_points(&value.text))
        .or_else(|| {
            find("SCORE")
                .and_then(|decl| decl.attr("normalMaximum"))
                .and_then(parse_points)
        })
        .unwrap_or(DEFAULT_POINTS)
}
