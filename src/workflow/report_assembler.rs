//! 报告组装 - 流程层
//!
//! 把校验、题目、分类、评分、内容特征组合成一份报告。
//! 纯函数：不读写文件，每次调用返回新的报告。

use crate::models::{
    CompatibilityReport, ParsedDocument, Question, QuestionSummary, ReportMetadata, SchemaVersion,
    ScoringSummary,
};
use crate::services::classifier::interaction_breakdown;
use crate::services::content_scanner::scan_content;
use crate::services::question_extractor::{extract_questions, ExtractOptions};
use crate::services::scorer::{assess_compatibility, note_structure_errors};
use crate::services::validator::validate_structure;
use std::collections::BTreeMap;

/// 组装报告
///
/// 结构校验失败时仍返回完整报告，由 `validation` 说明原因
pub fn assemble_report(doc: &ParsedDocument, raw: &str, extract: &ExtractOptions) -> CompatibilityReport {
    let validation = validate_structure(doc);
    let questions = extract_questions(doc, extract);
    let content_flags = scan_content(raw);

    let metadata = metadata(doc, questions.len());
    let question_summary = summarize(&questions);
    let interaction_breakdown = interaction_breakdown(&questions);
    let scoring = scoring(&questions);
    let mut compatibility = assess_compatibility(&questions, doc.schema_version, &content_flags);
    note_structure_errors(&mut compatibility, &validation);

    debug_assert_eq!(metadata.question_count, question_summary.total);

    CompatibilityReport {
        version: doc.schema_version,
        metadata,
        validation,
        question_summary,
        interaction_breakdown,
        scoring,
        compatibility,
        content_flags,
        package_info: None,
        questions,
        generated_at: chrono::Utc::now().to_rfc3339(),
    }
}

fn metadata(doc: &ParsedDocument, question_count: usize) -> ReportMetadata {
    let tree = &doc.tree;
    let (title, identifier) = match doc.schema_version {
        SchemaVersion::V1_2 => {
            let assessment = tree.child("assessment");
            (
                assessment.and_then(|a| a.attr("title")).or_else(|| tree.attr("title")),
                assessment.and_then(|a| a.attr("ident")).or_else(|| tree.attr("ident")),
            )
        }
        SchemaVersion::V2_1 => (tree.attr("title"), tree.attr("identifier")),
    };

    ReportMetadata {
        title: title.map(str::to_string),
        identifier: identifier.map(str::to_string),
        question_count,
    }
}

fn summarize(questions: &[Question]) -> QuestionSummary {
    let mut summary = QuestionSummary {
        total: questions.len(),
        ..Default::default()
    };

    for question in questions {
        *summary
            .by_type
            .entry(question.interaction_type.clone())
            .or_insert(0) += 1;
        *summary
            .by_points_bucket
            .entry(points_bucket(question.points).to_string())
            .or_insert(0) += 1;
        if question.has_feedback {
            summary.with_feedback += 1;
        }
        if question.has_media {
            summary.with_media += 1;
        }
    }

    summary
}

/// 分值区间（上界包含）
fn points_bucket(points: f64) -> &'static str {
    if points <= 0.0 {
        "0"
    } else if points <= 1.0 {
        "0-1"
    } else if points <= 5.0 {
        "1-5"
    } else if points <= 10.0 {
        "5-10"
    } else {
        "10+"
    }
}

fn scoring(questions: &[Question]) -> ScoringSummary {
    if questions.is_empty() {
        return ScoringSummary::default();
    }

    let total_points: f64 = questions.iter().map(|q| q.points).sum();
    let min_points = questions.iter().map(|q| q.points).fold(f64::INFINITY, f64::min);
    let max_points = questions.iter().map(|q| q.points).fold(f64::NEG_INFINITY, f64::max);

    let mut distribution: BTreeMap<String, usize> = BTreeMap::new();
    for question in questions {
        *distribution.entry(question.points.to_string()).or_insert(0) += 1;
    }

    ScoringSummary {
        total_points,
        avg_points: total_points / questions.len() as f64,
        min_points,
        max_points,
        distribution,
    }
}
