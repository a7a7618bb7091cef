//! 题型分类服务 - 业务能力层
//!
//! 题型 → 支持程度是一张固定的表，表中没有的题型一律视为不支持

use crate::models::{InteractionStat, InteractionSupport, Question};
use phf::phf_map;
use std::collections::BTreeMap;

static SUPPORT_TIERS: phf::Map<&'static str, InteractionSupport> = phf_map! {
    "Multiple Choice" => InteractionSupport::Full,
    "Multiple Answer" => InteractionSupport::Full,
    "True/False" => InteractionSupport::Full,
    "Fill in the Blank" => InteractionSupport::Full,
    "Essay" => InteractionSupport::Full,
    "Matching" => InteractionSupport::Full,
    "Numerical" => InteractionSupport::Full,
    "Multiple Dropdowns" => InteractionSupport::Full,
    "File Upload" => InteractionSupport::Full,
    "Ordering" => InteractionSupport::Limited,
    "Hotspot" => InteractionSupport::Limited,
    "Gap Match" => InteractionSupport::Limited,
    "Referenced Item" => InteractionSupport::Limited,
};

/// 查询题型的支持程度
pub fn support_for(interaction_type: &str) -> InteractionSupport {
    SUPPORT_TIERS
        .get(interaction_type)
        .copied()
        .unwrap_or(InteractionSupport::Unsupported)
}

/// 按题型汇总数量和支持程度
///
/// 每个出现过的题型恰好一条
pub fn interaction_breakdown(questions: &[Question]) -> BTreeMap<String, InteractionStat> {
    let mut breakdown: BTreeMap<String, InteractionStat> = BTreeMap::new();
    for question in questions {
        breakdown
            .entry(question.interaction_type.clone())
            .or_insert_with(|| InteractionStat {
                count: 0,
                support: support_for(&question.interaction_type),
            })
            .count += 1;
    }
    breakdown
}
