/// 日志工具模块
///
/// 提供日志初始化和输出格式的辅助函数
use crate::config::Config;
use crate::models::CompatibilityReport;
use crate::workflow::AnalysisCtx;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 优先使用 RUST_LOG，未设置时按 verbose 选择 debug / info
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - QTI 兼容性分析");
    info!("📊 最大并发数: {}", config.max_concurrent_files);
    info!("📁 报告目录: {}", config.output_folder);
    if let Some(depth) = config.max_section_depth {
        info!("📐 section 最大嵌套深度: {}", depth);
    }
    info!("{}", "=".repeat(60));
}

/// 记录待分析文件数量
pub fn log_files_found(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 个待分析的文件", total);
    info!("📋 最多同时分析 {} 个\n", max_concurrent);
}

/// 记录单个报告结论
pub fn log_report(ctx: &AnalysisCtx, report: &CompatibilityReport) {
    info!("{} ✓ {}", ctx, report.summary_line());

    if let Some(title) = &report.metadata.title {
        info!("{}   标题: {}", ctx, truncate_text(title, 60));
    }
    for error in &report.validation.errors {
        warn!("{}   ⚠️ {}", ctx, error);
    }
    for issue in &report.compatibility.issues {
        warn!("{}   ❌ {}", ctx, issue.message);
    }
}

/// 打印最终统计信息
pub fn print_final_stats(success: usize, failed: usize, total: usize, output_folder: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部分析完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
    info!("\n报告已保存至: {}", output_folder);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符数）
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("短标题", 10), "短标题");
        assert_eq!(truncate_text("期中考试第一部分", 4), "期中考试...");
    }
}
