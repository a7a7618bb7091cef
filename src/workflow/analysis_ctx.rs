//! 分析上下文
//!
//! 封装"我正在分析第几个文件、它是什么类型"这一信息

use std::fmt::Display;
use std::path::Path;

/// 输入类型，由文件扩展名决定走哪个入口
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// 单个 XML 文档
    Document,
    /// 压缩包（.zip / .imscc）
    Package,
}

impl InputKind {
    /// 根据扩展名判断，不认识的扩展名返回 None
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "xml" | "qti" => Some(InputKind::Document),
            "zip" | "imscc" => Some(InputKind::Package),
            _ => None,
        }
    }
}

/// 单个文件的分析上下文
#[derive(Debug, Clone)]
pub struct AnalysisCtx {
    /// 文件名（仅用于日志和报告文件名）
    pub source_name: String,

    /// 文件序号（从1开始）
    pub file_index: usize,

    pub kind: InputKind,
}

impl AnalysisCtx {
    pub fn new(source_name: String, file_index: usize, kind: InputKind) -> Self {
        Self {
            source_name,
            file_index,
            kind,
        }
    }
}

impl Display for AnalysisCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[文件 #{} {}]", self.file_index, self.source_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(InputKind::from_path(Path::new("quiz.XML")), Some(InputKind::Document));
        assert_eq!(InputKind::from_path(Path::new("course.imscc")), Some(InputKind::Package));
        assert_eq!(InputKind::from_path(Path::new("export.zip")), Some(InputKind::Package));
        assert_eq!(InputKind::from_path(Path::new("notes.txt")), None);
        assert_eq!(InputKind::from_path(Path::new("no_extension")), None);
    }

    #[test]
    fn test_display() {
        let ctx = AnalysisCtx::new("quiz.xml".to_string(), 3, InputKind::Document);
        assert_eq!(ctx.to_string(), "[文件 #3 quiz.xml]");
    }
}
