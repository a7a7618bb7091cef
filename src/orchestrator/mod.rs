//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责文件读写和批量调度，分析本身是纯计算，不在这里发生。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量处理器
//! - 收集输入文件（命令行参数或输入目录）
//! - 控制并发数量（Semaphore）
//! - 输出全局统计信息
//!
//! ### `file_processor` - 单个文件处理器
//! - 读取文件字节
//! - 按扩展名选择文档 / 压缩包入口
//! - 写出 JSON 报告
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<PathBuf>)
//!     ↓
//! file_processor (处理单个文件)
//!     ↓
//! workflow::Analyzer (文档 / 压缩包 → 报告)
//!     ↓
//! services (能力层：解析 / 解包 / 校验 / 提取 / 分类 / 评分)
//! ```

pub mod batch_processor;
pub mod file_processor;

// 重新导出主要类型
pub use batch_processor::{App, ProcessingStats};
pub use file_processor::{analyze_bytes, process_file};
