//! 兼容性评分服务 - 业务能力层
//!
//! 规则是确定的：
//! - QTI 1.2 固定一条中等 warning（版本提示，不扣分）
//! - 每种不支持的题型一条高危 issue（汇总题目数量）
//! - 每种部分支持的题型一条中等 warning
//! - 含外部链接一条中等 warning
//!
//! 建议与评分无关，总至少有一条

use crate::models::{
    CompatibilityAssessment, ContentFlags, Finding, FindingCategory, InteractionSupport, Question,
    SchemaVersion, Severity, ValidationResult,
};
use crate::services::classifier::interaction_breakdown;

/// 没有任何问题时的唯一建议
pub const READY_FOR_IMPORT: &str = "Assessment is ready for import; no compatibility problems were detected.";

/// 结构校验未通过时的建议
pub const FIX_STRUCTURE: &str = "Fix the structural validation errors before import; the document does not have the expected QTI structure.";

const MAX_SCORE: u32 = 100;

/// 生成兼容性结论
pub fn assess_compatibility(
    questions: &[Question],
    version: SchemaVersion,
    flags: &ContentFlags,
) -> CompatibilityAssessment {
    let mut issues = Vec::new();
    let mut warnings = Vec::new();
    let mut recommendations = Vec::new();

    if version.is_legacy() {
        warnings.push(Finding {
            severity: Severity::Medium,
            category: FindingCategory::Schema,
            message: "QTI 1.2 is a legacy format; some item settings may not carry over on import.".to_string(),
            affected_questions: questions.len(),
        });
        recommendations.push(
            "Re-export the assessment as QTI 2.1 if the authoring tool supports it.".to_string(),
        );
    }

    for (interaction_type, stat) in interaction_breakdown(questions) {
        match stat.support {
            InteractionSupport::Full => {}
            InteractionSupport::Limited => {
                warnings.push(Finding {
                    severity: Severity::Medium,
                    category: FindingCategory::Interaction,
                    message: format!(
                        "{} question(s) use '{}', which has limited support.",
                        stat.count, interaction_type
                    ),
                    affected_questions: stat.count,
                });
                recommendations.push(format!(
                    "Review the {} '{}' question(s) after import to confirm they behave as expected.",
                    stat.count, interaction_type
                ));
            }
            InteractionSupport::Unsupported => {
                issues.push(Finding {
                    severity: Severity::High,
                    category: FindingCategory::Interaction,
                    message: format!(
                        "{} question(s) use the unsupported interaction type '{}'.",
                        stat.count, interaction_type
                    ),
                    affected_questions: stat.count,
                });
                recommendations.push(format!(
                    "Rebuild the {} '{}' question(s) with a supported question type before import.",
                    stat.count, interaction_type
                ));
            }
        }
    }

    if flags.has_external_links {
        warnings.push(Finding {
            severity: Severity::Medium,
            category: FindingCategory::Content,
            message: "Content contains external links that may not be reachable after import.".to_string(),
            affected_questions: 0,
        });
        recommendations.push("Check that external links are reachable from the target LMS.".to_string());
    }

    if recommendations.is_empty() {
        recommendations.push(READY_FOR_IMPORT.to_string());
    }

    CompatibilityAssessment {
        compatible: issues.is_empty(),
        score: compute_score(&issues, &warnings),
        issues,
        warnings,
        recommendations,
    }
}

/// 结构校验未通过时，建议不再声称可以直接导入
///
/// 分数和 `compatible` 不变，只调整建议
pub fn note_structure_errors(assessment: &mut CompatibilityAssessment, validation: &ValidationResult) {
    if validation.valid {
        return;
    }
    assessment.recommendations.retain(|r| r != READY_FOR_IMPORT);
    assessment.recommendations.insert(0, FIX_STRUCTURE.to_string());
}

/// 计算兼容性分数
///
/// 从 100 开始按严重程度扣分，结果限制在 [0, 100]；版本提示不扣分
pub fn compute_score(issues: &[Finding], warnings: &[Finding]) -> u8 {
    let issue_penalty: u32 = issues
        .iter()
        .filter(|f| f.category != FindingCategory::Schema)
        .map(|f| f.severity.issue_penalty())
        .sum();
    let warning_penalty: u32 = warnings
        .iter()
        .filter(|f| f.category != FindingCategory::Schema)
        .map(|f| f.severity.warning_penalty())
        .sum();

    MAX_SCORE
        .saturating_sub(issue_penalty.saturating_add(warning_penalty))
        .min(MAX_SCORE) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(interaction_type: &str) -> Question {
        Question {
            interaction_type: interaction_type.to_string(),
            ..Default::default()
        }
    }

    fn finding(severity: Severity) -> Finding {
        Finding {
            severity,
            category: FindingCategory::Interaction,
            message: String::new(),
            affected_questions: 1,
        }
    }

    #[test]
    fn test_penalties() {
        assert_eq!(compute_score(&[], &[]), 100);
        assert_eq!(compute_score(&[finding(Severity::High)], &[]), 80);
        assert_eq!(compute_score(&[finding(Severity::Medium)], &[]), 90);
        assert_eq!(compute_score(&[finding(Severity::Low)], &[]), 95);
        assert_eq!(compute_score(&[], &[finding(Severity::High)]), 90);
        assert_eq!(compute_score(&[], &[finding(Severity::Medium)]), 95);
        assert_eq!(compute_score(&[], &[finding(Severity::Low)]), 98);
    }

    #[test]
    fn test_score_floors_at_zero() {
        let issues: Vec<Finding> = (0..8).map(|_| finding(Severity::High)).collect();
        assert_eq!(compute_score(&issues, &[]), 0);
    }

    #[test]
    fn test_all_full_is_ready_for_import() {
        let questions = vec![question("Multiple Choice"), question("Essay")];
        let result = assess_compatibility(&questions, SchemaVersion::V2_1, &ContentFlags::default());
        assert!(result.compatible);
        assert_eq!(result.score, 100);
        assert!(result.issues.is_empty());
        assert!(result.warnings.is_empty());
        assert_eq!(result.recommendations, vec![READY_FOR_IMPORT.to_string()]);
    }

    #[test]
    fn test_unsupported_types_aggregate_per_type() {
        let questions = vec![question("Drawing"), question("Drawing"), question("Slider")];
        let result = assess_compatibility(&questions, SchemaVersion::V2_1, &ContentFlags::default());
        assert!(!result.compatible);
        assert_eq!(result.issues.len(), 2);
        let drawing = result
            .issues
            .iter()
            .find(|f| f.message.contains("Drawing"))
            .unwrap();
        assert_eq!(drawing.affected_questions, 2);
        assert_eq!(result.score, 60);
    }

    #[test]
    fn test_score_non_increasing_with_more_unsupported_types() {
        let mut questions = vec![question("Multiple Choice"), question("Ordering")];
        let mut last = assess_compatibility(&questions, SchemaVersion::V2_1, &ContentFlags::default()).score;
        for extra in ["Drawing", "Slider", "Custom", "Media", "Associate", "unknown"] {
            questions.push(question(extra));
            let score = assess_compatibility(&questions, SchemaVersion::V2_1, &ContentFlags::default()).score;
            assert!(score <= last);
            assert!(score <= 100);
            last = score;
        }
        assert_eq!(last, 0);
    }

    #[test]
    fn test_legacy_warning_does_not_deduct() {
        let questions = vec![question("Numerical")];
        let result = assess_compatibility(&questions, SchemaVersion::V1_2, &ContentFlags::default());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].severity, Severity::Medium);
        assert_eq!(result.warnings[0].category, FindingCategory::Schema);
        assert_eq!(result.score, 100);
        assert!(!result.recommendations.contains(&READY_FOR_IMPORT.to_string()));
    }

    #[test]
    fn test_external_links_and_limited_types_warn() {
        let flags = ContentFlags {
            has_external_links: true,
            ..Default::default()
        };
        let questions = vec![question("Hotspot")];
        let result = assess_compatibility(&questions, SchemaVersion::V2_1, &flags);
        assert!(result.compatible);
        assert_eq!(result.warnings.len(), 2);
        assert_eq!(result.score, 90);
        assert_eq!(result.recommendations.len(), 2);
    }

    #[test]
    fn test_structure_errors_replace_ready_for_import() {
        let mut result = assess_compatibility(&[], SchemaVersion::V2_1, &ContentFlags::default());
        let validation = ValidationResult {
            valid: false,
            errors: vec!["unexpected root".to_string()],
            warnings: Vec::new(),
        };
        note_structure_errors(&mut result, &validation);
        assert_eq!(result.recommendations, vec![FIX_STRUCTURE.to_string()]);
        assert_eq!(result.score, 100);

        let mut clean = assess_compatibility(&[], SchemaVersion::V2_1, &ContentFlags::default());
        note_structure_errors(&mut clean, &ValidationResult { valid: true, ..Default::default() });
        assert_eq!(clean.recommendations, vec![READY_FOR_IMPORT.to_string()]);
    }
}
