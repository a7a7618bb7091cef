use crate::services::{ExtractOptions, ParseOptions};
use crate::workflow::AnalyzeOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_FILE: &str = "qti_analyzer.toml";

/// 程序配置文件
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 同时分析的文件数量
    pub max_concurrent_files: usize,
    /// 待分析文件目录（命令行未指定文件时扫描）
    pub input_folder: String,
    /// 报告输出目录
    pub output_folder: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 报告 JSON 是否格式化输出
    pub pretty_json: bool,
    /// 嵌套 section 最大深度，不设置则不限制
    pub max_section_depth: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_files: 8,
            input_folder: "qti_input".to_string(),
            output_folder: "reports".to_string(),
            verbose_logging: false,
            pretty_json: true,
            max_section_depth: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 加载配置：配置文件（QTI_CONFIG 或默认路径，存在时）→ 环境变量覆盖
    pub fn load() -> Result<Self> {
        let path = std::env::var("QTI_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let base = if Path::new(&path).exists() {
            Self::from_toml_file(Path::new(&path))?
        } else {
            Self::default()
        };
        Ok(base.with_env_overrides())
    }

    /// 从 TOML 文件加载，缺失的字段取默认值
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn with_env_overrides(self) -> Self {
        Self {
            max_concurrent_files: std::env::var("MAX_CONCURRENT_FILES").ok().and_then(|v| v.parse().ok()).unwrap_or(self.max_concurrent_files),
            input_folder: std::env::var("QTI_INPUT_FOLDER").unwrap_or(self.input_folder),
            output_folder: std::env::var("REPORT_OUTPUT_FOLDER").unwrap_or(self.output_folder),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
            pretty_json: std::env::var("PRETTY_JSON").ok().and_then(|v| v.parse().ok()).unwrap_or(self.pretty_json),
            max_section_depth: std::env::var("MAX_SECTION_DEPTH").ok().and_then(|v| v.parse().ok()).or(self.max_section_depth),
        }
    }

    /// 转为分析选项
    pub fn analyze_options(&self) -> AnalyzeOptions {
        AnalyzeOptions {
            parse: ParseOptions::default(),
            extract: ExtractOptions {
                max_section_depth: self.max_section_depth,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml_str("output_folder = \"out\"\nmax_section_depth = 16\n").unwrap();
        assert_eq!(config.output_folder, "out");
        assert_eq!(config.max_section_depth, Some(16));
        assert_eq!(config.max_concurrent_files, Config::default().max_concurrent_files);
        assert_eq!(config.analyze_options().extract.max_section_depth, Some(16));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(Config::from_toml_str("max_concurrent_files = \"many\"").is_err());
    }

    #[test]
    fn test_default_has_no_depth_limit() {
        assert_eq!(Config::default().analyze_options().extract.max_section_depth, None);
    }
}
