//! 单个文件处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **读取文件**：异步读取字节
//! 2. **选择入口**：按扩展名走文档或压缩包分析
//! 3. **隔离计算**：分析在阻塞线程池中执行，不占用异步工作线程
//! 4. **写出报告**：`<文件名>.report.json`

use crate::config::Config;
use crate::models::CompatibilityReport;
use crate::utils::logging::log_report;
use crate::workflow::{AnalysisCtx, Analyzer, InputKind};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// 处理单个文件
///
/// # 参数
/// - `analyzer`: 分析器
/// - `path`: 文件路径
/// - `ctx`: 分析上下文（用于日志）
/// - `config`: 配置
///
/// # 返回
/// 返回生成的报告
pub async fn process_file(
    analyzer: Analyzer,
    path: &Path,
    ctx: &AnalysisCtx,
    config: &Config,
) -> Result<CompatibilityReport> {
    info!("{} 🔍 开始分析...", ctx);

    let bytes = fs::read(path)
        .await
        .with_context(|| format!("无法读取文件: {}", path.display()))?;

    let report = analyze_bytes(analyzer, ctx.kind, bytes)
        .await
        .with_context(|| format!("{} 分析失败", ctx))?;

    log_report(ctx, &report);

    let output = write_report(&report, path, config).await?;
    info!("{} 💾 报告已写入: {}", ctx, output.display());

    Ok(report)
}

/// 按输入类型分析字节内容（在阻塞线程池中执行）
pub async fn analyze_bytes(
    analyzer: Analyzer,
    kind: InputKind,
    bytes: Vec<u8>,
) -> Result<CompatibilityReport> {
    let report = match kind {
        InputKind::Document => {
            let raw = String::from_utf8_lossy(&bytes).into_owned();
            analyzer.analyze_document_async(raw).await?
        }
        InputKind::Package => analyzer.analyze_package_async(bytes).await?,
    };

    Ok(report)
}

/// 写出报告文件
async fn write_report(report: &CompatibilityReport, source: &Path, config: &Config) -> Result<PathBuf> {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "report".to_string());
    let output = Path::new(&config.output_folder).join(format!("{}.report.json", stem));

    let json = if config.pretty_json {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };

    let size = json.len();
    fs::create_dir_all(&config.output_folder)
        .await
        .with_context(|| format!("无法创建报告目录: {}", config.output_folder))?;
    fs::write(&output, json)
        .await
        .with_context(|| format!("无法写入报告: {}", output.display()))?;

    debug!("报告大小: {} 字节", size);
    Ok(output)
}
