//! 批量文件处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是命令行程序的入口，负责批量分析和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：输出启动信息、准备报告目录、创建分析器
//! 2. **收集输入**：命令行指定的文件，或扫描输入目录
//! 3. **并发控制**：使用 Semaphore 限制同时分析的文件数量
//! 4. **全局统计**：汇总所有文件的处理结果
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个文件的细节，委托 file_processor
//! - **结果有序**：按输入顺序汇总，与任务完成顺序无关

use crate::config::Config;
use crate::orchestrator::file_processor;
use crate::utils::logging::{log_files_found, log_startup, print_final_stats};
use crate::workflow::{AnalysisCtx, Analyzer, InputKind};
use anyhow::{Context, Result};
use futures::future::join_all;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
}

/// 应用主结构
pub struct App {
    config: Config,
    analyzer: Analyzer,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        fs::create_dir_all(&config.output_folder)
            .await
            .with_context(|| format!("无法创建报告目录: {}", config.output_folder))?;

        let analyzer = Analyzer::with_options(config.analyze_options());

        Ok(Self { config, analyzer })
    }

    /// 运行应用主逻辑
    ///
    /// `paths` 为空时扫描配置中的输入目录
    pub async fn run(&self, paths: Vec<PathBuf>) -> Result<ProcessingStats> {
        let inputs = if paths.is_empty() {
            self.scan_input_folder().await?
        } else {
            paths
        };

        let jobs = self.build_jobs(inputs);
        if jobs.is_empty() {
            warn!("⚠️ 没有找到待分析的 QTI 文件，程序结束");
            return Ok(ProcessingStats::default());
        }

        log_files_found(jobs.len(), self.config.max_concurrent_files);

        let stats = self.process_all(jobs).await?;

        print_final_stats(stats.success, stats.failed, stats.total, &self.config.output_folder);

        Ok(stats)
    }

    /// 扫描输入目录，按文件名排序
    async fn scan_input_folder(&self) -> Result<Vec<PathBuf>> {
        info!("\n📁 正在扫描待分析的文件: {}", self.config.input_folder);

        let mut entries = fs::read_dir(&self.config.input_folder)
            .await
            .with_context(|| format!("无法读取文件夹: {}", self.config.input_folder))?;

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.is_file() && InputKind::from_path(&path).is_some() {
                paths.push(path);
            }
        }
        paths.sort();

        Ok(paths)
    }

    /// 为每个可识别的文件创建上下文
    fn build_jobs(&self, inputs: Vec<PathBuf>) -> Vec<(PathBuf, AnalysisCtx)> {
        let mut jobs = Vec::new();
        for path in inputs {
            let Some(kind) = InputKind::from_path(&path) else {
                warn!("⚠️ 跳过无法识别的文件类型: {}", path.display());
                continue;
            };
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            let ctx = AnalysisCtx::new(name, jobs.len() + 1, kind);
            jobs.push((path, ctx));
        }
        jobs
    }

    /// 并发处理所有文件
    async fn process_all(&self, jobs: Vec<(PathBuf, AnalysisCtx)>) -> Result<ProcessingStats> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_files.max(1)));
        let total = jobs.len();
        let mut handles = Vec::with_capacity(total);

        for (path, ctx) in jobs {
            let permit = semaphore.clone().acquire_owned().await?;
            let analyzer = self.analyzer;
            let config = self.config.clone();

            handles.push(tokio::spawn(async move {
                let _permit = permit;
                match file_processor::process_file(analyzer, &path, &ctx, &config).await {
                    Ok(_) => true,
                    Err(e) => {
                        error!("{} ❌ 处理过程中发生错误: {:#}", ctx, e);
                        false
                    }
                }
            }));
        }

        let mut stats = ProcessingStats {
            total,
            ..Default::default()
        };

        for result in join_all(handles).await {
            match result {
                Ok(true) => stats.success += 1,
                Ok(false) => stats.failed += 1,
                Err(e) => {
                    error!("任务执行失败: {}", e);
                    stats.failed += 1;
                }
            }
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(dir: &std::path::Path) -> Config {
        Config {
            input_folder: dir.join("in").to_string_lossy().to_string(),
            output_folder: dir.join("out").to_string_lossy().to_string(),
            max_concurrent_files: 2,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_run_scans_input_folder() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        std::fs::create_dir_all(&input).unwrap();
        std::fs::write(input.join("a.xml"), "<questestinterop><item ident=\"q\"/></questestinterop>").unwrap();
        std::fs::write(input.join("b.xml"), "<questestinterop><item>").unwrap();
        std::fs::write(input.join("notes.txt"), "ignored").unwrap();

        let app = App::initialize(config_for(dir.path())).await.unwrap();
        let stats = app.run(Vec::new()).await.unwrap();

        assert_eq!(stats, ProcessingStats { success: 1, failed: 1, total: 2 });
        assert!(dir.path().join("out").join("a.report.json").exists());
        assert!(!dir.path().join("out").join("b.report.json").exists());
    }

    #[tokio::test]
    async fn test_run_skips_unknown_paths() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::initialize(config_for(dir.path())).await.unwrap();
        let stats = app.run(vec![PathBuf::from("readme.md")]).await.unwrap();
        assert_eq!(stats, ProcessingStats::default());
    }
}
