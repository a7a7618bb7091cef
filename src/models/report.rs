//! 兼容性报告数据结构
//!
//! 每次分析重新构建，返回后不再修改

use crate::models::document::SchemaVersion;
use crate::models::question::Question;
use crate::models::support::InteractionSupport;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 问题严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// 作为 issue 时扣除的分数
    pub fn issue_penalty(self) -> u32 {
        match self {
            Severity::High => 20,
            Severity::Medium => 10,
            Severity::Low => 5,
        }
    }

    /// 作为 warning 时扣除的分数
    pub fn warning_penalty(self) -> u32 {
        match self {
            Severity::High => 10,
            Severity::Medium => 5,
            Severity::Low => 2,
        }
    }
}

/// 问题来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingCategory {
    /// 题型相关
    Interaction,
    /// 内容特征相关（外部链接等）
    Content,
    /// 规范版本提示，不参与扣分
    Schema,
}

/// 单条 issue / warning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub severity: Severity,
    pub category: FindingCategory,
    pub message: String,
    /// 受影响的题目数量
    pub affected_questions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub title: Option<String>,
    pub identifier: Option<String>,
    pub question_count: usize,
}

/// 结构校验结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSummary {
    pub total: usize,
    pub by_type: BTreeMap<String, usize>,
    pub by_points_bucket: BTreeMap<String, usize>,
    pub with_feedback: usize,
    pub with_media: usize,
}

/// 单个题型的统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionStat {
    pub count: usize,
    pub support: InteractionSupport,
}

/// 分值统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringSummary {
    pub total_points: f64,
    pub avg_points: f64,
    pub min_points: f64,
    pub max_points: f64,
    /// 分值 → 题目数量
    pub distribution: BTreeMap<String, usize>,
}

/// 兼容性结论
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityAssessment {
    pub compatible: bool,
    /// 0-100
    pub score: u8,
    pub issues: Vec<Finding>,
    pub warnings: Vec<Finding>,
    pub recommendations: Vec<String>,
}

/// 内容特征标记
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFlags {
    pub has_images: bool,
    pub has_audio: bool,
    pub has_video: bool,
    pub has_external_links: bool,
    pub has_math: bool,
    pub has_tables: bool,
    pub has_formatted_text: bool,
}

/// 压缩包信息（仅压缩包入口）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageInfo {
    pub file_count: usize,
    pub files: Vec<String>,
    pub has_manifest: bool,
}

/// 完整的兼容性报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityReport {
    pub version: SchemaVersion,
    pub metadata: ReportMetadata,
    pub validation: ValidationResult,
    pub question_summary: QuestionSummary,
    pub interaction_breakdown: BTreeMap<String, InteractionStat>,
    pub scoring: ScoringSummary,
    pub compatibility: CompatibilityAssessment,
    pub content_flags: ContentFlags,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_info: Option<PackageInfo>,
    pub questions: Vec<Question>,
    pub generated_at: String,
}

impl CompatibilityReport {
    /// 一行摘要，用于日志
    pub fn summary_line(&self) -> String {
        format!(
            "{} | {} 道题 | {} 分 | 兼容性 {}/100{}",
            self.version,
            self.metadata.question_count,
            self.scoring.total_points,
            self.compatibility.score,
            if self.validation.valid { "" } else { " | 结构校验未通过" }
        )
    }
}
