//! # QTI Analyzer
//!
//! 一个用于分析 QTI 测评包兼容性的 Rust 库
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 数据层（Models）
//! - `models/` - 文档树、题目、压缩包、报告等纯数据类型
//! - `XmlNode` - 按子元素名分组的列表化文档树
//! - `CompatibilityReport` - 最终输出的报告
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，每个能力都是无状态的纯函数
//! - `document_parser` - XML 解析与版本识别
//! - `package_extractor` - 压缩包解包
//! - `validator` / `question_extractor` / `classifier` / `scorer` / `content_scanner`
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一份文档"的完整分析流程
//! - `AnalysisCtx` - 上下文封装（文件序号 + 输入类型）
//! - `Analyzer` - 流程编排（parse → validate → extract → classify → score）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量文件处理器，管理并发
//! - `orchestrator/file_processor` - 单个文件处理器，读写文件
//!
//! ## 模块结构

pub mod config;
pub mod error;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AnalysisError, AnalysisResult};
pub use models::{CompatibilityReport, Question, SchemaVersion};
pub use orchestrator::{App, ProcessingStats};
pub use workflow::{AnalysisCtx, AnalyzeOptions, Analyzer, InputKind};

/// 使用默认选项分析单个 QTI XML 文档
pub fn analyze_document(raw: &str) -> AnalysisResult<CompatibilityReport> {
    Analyzer::new().analyze_document(raw)
}

/// 使用默认选项分析 QTI 压缩包
pub fn analyze_package(bytes: &[u8]) -> AnalysisResult<CompatibilityReport> {
    Analyzer::new().analyze_package(bytes)
}

/// `analyze_document` 的异步版本
pub async fn analyze_document_async(raw: impl Into<String>) -> AnalysisResult<CompatibilityReport> {
    Analyzer::new().analyze_document_async(raw.into()).await
}

/// `analyze_package` 的异步版本
pub async fn analyze_package_async(bytes: impl Into<Vec<u8>>) -> AnalysisResult<CompatibilityReport> {
    Analyzer::new().analyze_package_async(bytes.into()).await
}
