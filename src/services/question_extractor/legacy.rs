//! QTI 1.2 遍历器
//!
//! 题目位于根元素下，或 assessment 下的 section 中（section 只嵌套一层）

use super::{has_media, parse_points};
use crate::models::question::{DEFAULT_POINTS, UNKNOWN_INTERACTION};
use crate::models::{Question, XmlNode};

/// presentation 中的作答形态 → 题型，按顺序匹配
const RESPONSE_SHAPES: &[(&str, &str)] = &[
    ("response_lid", "Multiple Choice"),
    ("response_str", "Fill in the Blank"),
    ("response_num", "Numerical"),
    ("response_xy", "Hotspot"),
    ("response_grp", "Matching"),
];

pub fn extract(root: &XmlNode) -> Vec<Question> {
    let mut items: Vec<&XmlNode> = root.children("item").iter().collect();
    for assessment in root.children("assessment") {
        for section in assessment.children("section") {
            items.extend(section.children("item"));
        }
    }

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| build_question(item, index + 1))
        .collect()
}

fn build_question(item: &XmlNode, position: usize) -> Question {
    let resprocessing = item.child("resprocessing");

    let points = resprocessing
        .and_then(|rp| rp.child("outcomes"))
        .and_then(|outcomes| outcomes.child("decvar"))
        .and_then(|decvar| decvar.attr("maxvalue"))
        .and_then(parse_points)
        .unwrap_or(DEFAULT_POINTS);

    let has_feedback = item.has_child("itemfeedback")
        || resprocessing.map(|rp| rp.has_child("respcondition")).unwrap_or(false);

    Question {
        id: item
            .attr("ident")
            .map(str::to_string)
            .unwrap_or_else(|| format!("question_{}", position)),
        title: item.attr("title").map(str::to_string),
        interaction_type: interaction_type(item),
        points,
        has_feedback,
        has_media: has_media(item),
        href: None,
    }
}

/// 根据 presentation 中出现的作答形态判断题型
fn interaction_type(item: &XmlNode) -> String {
    let Some(presentation) = item.child("presentation") else {
        return UNKNOWN_INTERACTION.to_string();
    };

    for &(shape, label) in RESPONSE_SHAPES {
        if let Some(response) = presentation.find_descendant(shape) {
            return refine(shape, response).unwrap_or(label).to_string();
        }
    }

    UNKNOWN_INTERACTION.to_string()
}

/// 多选与问答题细分
fn refine(shape: &str, response: &XmlNode) -> Option<&'static str> {
    match shape {
        "response_lid" if response.attr("rcardinality") == Some("Multiple") => Some("Multiple Answer"),
        "response_str" => {
            let rows = response
                .child("render_fib")
                .and_then(|fib| fib.attr("rows"))
                .and_then(|rows| rows.trim().parse::<u32>().ok())
                .unwrap_or(1);
            (rows > 1).then_some("Essay")
        }
        _ => None,
    }
}
