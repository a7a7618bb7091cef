use thiserror::Error;

/// 分析错误类型
///
/// 只有这几种情况会中断分析，其余问题都会被吸收进报告内容
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// 输入不是格式良好的 XML
    #[error("输入不是格式良好的 XML: {message}")]
    InputMalformed {
        message: String,
        /// 出错位置（字节偏移）
        position: Option<u64>,
    },

    /// 压缩包中没有任何 QTI 文件
    #[error("压缩包中没有找到 QTI 评估文件 (共 {entry_count} 个条目)")]
    EmptyPackage { entry_count: usize },

    /// 压缩包本身无法读取
    #[error("无法读取压缩包: {source}")]
    InvalidArchive {
        #[from]
        source: zip::result::ZipError,
    },

    /// 阻塞线程池中的分析任务没有正常结束
    #[error("分析任务异常退出: {source}")]
    TaskAborted {
        #[from]
        source: tokio::task::JoinError,
    },
}

// ========== 便捷构造函数 ==========

impl AnalysisError {
    /// 创建格式错误（不带位置）
    pub fn malformed(message: impl Into<String>) -> Self {
        AnalysisError::InputMalformed {
            message: message.into(),
            position: None,
        }
    }

    /// 创建格式错误（带字节偏移）
    pub fn malformed_at(message: impl Into<String>, position: u64) -> Self {
        AnalysisError::InputMalformed {
            message: message.into(),
            position: Some(position),
        }
    }

    /// 是否为输入本身的问题（宿主应提示用户更换文件）
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::InputMalformed { .. } | AnalysisError::InvalidArchive { .. }
        )
    }
}

// ========== Result 类型别名 ==========

/// 分析结果类型
pub type AnalysisResult<T> = Result<T, AnalysisError>;
