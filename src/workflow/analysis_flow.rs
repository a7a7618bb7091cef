//! 分析流程 - 流程层
//!
//! 两个入口：
//! 1. 单个文档：解析 → 格式错误直接失败 → 组装报告
//! 2. 压缩包：解包 → 只分析第一个候选文件 → 组装报告 + 压缩包信息
//!
//! 两个入口都有 async 版本，在 tokio 阻塞线程池中执行同步流程

use tracing::{debug, info};

use crate::error::{AnalysisError, AnalysisResult};
use crate::models::{CompatibilityReport, PackageInfo};
use crate::services::document_parser::{try_parse_document, ParseOptions};
use crate::services::package_extractor::extract_package;
use crate::services::question_extractor::ExtractOptions;
use crate::workflow::report_assembler::assemble_report;

/// 分析选项
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzeOptions {
    pub parse: ParseOptions,
    pub extract: ExtractOptions,
}

/// 分析器
///
/// 不持有任何可变状态，可在多个任务间复制使用
#[derive(Debug, Clone, Copy, Default)]
pub struct Analyzer {
    options: AnalyzeOptions,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: AnalyzeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AnalyzeOptions {
        &self.options
    }

    /// 分析单个文档
    pub fn analyze_document(&self, raw: &str) -> AnalysisResult<CompatibilityReport> {
        let doc = try_parse_document(raw, &self.options.parse)?;
        let report = assemble_report(&doc, raw, &self.options.extract);
        debug!("✓ 分析完成: {}", report.summary_line());
        Ok(report)
    }

    /// 分析压缩包
    ///
    /// 只分析第一个候选文件，其余文件只在 `package_info` 中列出
    pub fn analyze_package(&self, bytes: &[u8]) -> AnalysisResult<CompatibilityReport> {
        let bundle = extract_package(bytes, &self.options.parse)?;
        let primary = bundle.primary().ok_or(AnalysisError::EmptyPackage {
            entry_count: bundle.entry_count,
        })?;

        if bundle.candidate_files.len() > 1 {
            info!(
                "📄 压缩包含 {} 个 QTI 文件，只分析第一个: {}",
                bundle.candidate_files.len(),
                primary.name
            );
        }

        let mut report = self.analyze_document(&primary.raw_text)?;
        report.package_info = Some(PackageInfo {
            file_count: bundle.candidate_files.len(),
            files: bundle.file_names(),
            has_manifest: bundle.has_manifest(),
        });

        Ok(report)
    }

    /// 异步分析单个文档
    pub async fn analyze_document_async(&self, raw: String) -> AnalysisResult<CompatibilityReport> {
        let analyzer = *self;
        tokio::task::spawn_blocking(move || analyzer.analyze_document(&raw)).await?
    }

    /// 异步分析压缩包
    pub async fn analyze_package_async(&self, bytes: Vec<u8>) -> AnalysisResult<CompatibilityReport> {
        let analyzer = *self;
        tokio::task::spawn_blocking(move || analyzer.analyze_package(&bytes)).await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::REFERENCED_ITEM;

    #[test]
    fn test_malformed_document_fails_fast() {
        let err = Analyzer::new().analyze_document("<questestinterop><item>").unwrap_err();
        assert!(matches!(err, AnalysisError::InputMalformed { .. }));
    }

    #[test]
    fn test_depth_option_is_applied() {
        let raw = r#"<assessmentTest><testPart><assessmentSection>
            <assessmentSection><assessmentItemRef identifier="deep"/></assessmentSection>
            <assessmentItemRef identifier="top"/>
        </assessmentSection></testPart></assessmentTest>"#;

        let unlimited = Analyzer::new().analyze_document(raw).unwrap();
        assert_eq!(unlimited.metadata.question_count, 2);

        let limited = Analyzer::with_options(AnalyzeOptions {
            extract: ExtractOptions {
                max_section_depth: Some(1),
            },
            ..Default::default()
        })
        .analyze_document(raw)
        .unwrap();
        assert_eq!(limited.metadata.question_count, 1);
        assert_eq!(limited.questions[0].id, "top");
        assert_eq!(limited.questions[0].interaction_type, REFERENCED_ITEM);
    }

    #[tokio::test]
    async fn test_analyze_document_async() {
        let raw = r#"<assessmentItem identifier="q1"><itemBody><matchInteraction/></itemBody></assessmentItem>"#;
        let report = Analyzer::new()
            .analyze_document_async(raw.to_string())
            .await
            .unwrap();
        assert_eq!(report.questions[0].interaction_type, "Matching");

        let err = Analyzer::new()
            .analyze_document_async("<assessmentItem>".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InputMalformed { .. }));
    }

    #[tokio::test]
    async fn test_analyze_package_async() {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        writer
            .start_file("readme.txt", zip::write::SimpleFileOptions::default())
            .unwrap();
        std::io::Write::write_all(&mut writer, b"no assessments here").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let err = Analyzer::new().analyze_package_async(bytes).await.unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyPackage { entry_count: 1 }));

        let err = Analyzer::new()
            .analyze_package_async(b"not a zip".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidArchive { .. }));
    }
}
