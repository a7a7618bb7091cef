use crate::models::document::XmlNode;

/// 压缩包中的候选评估文件
#[derive(Debug, Clone)]
pub struct CandidateFile {
    /// 压缩包内路径
    pub name: String,
    pub raw_text: String,
}

/// 解包结果
#[derive(Debug, Clone)]
pub struct PackageBundle {
    /// imsmanifest.xml 的解析结果，缺失或格式错误时为 None
    pub manifest_tree: Option<XmlNode>,
    /// 按压缩包枚举顺序排列的候选文件
    pub candidate_files: Vec<CandidateFile>,
    /// 压缩包条目总数
    pub entry_count: usize,
}

impl PackageBundle {
    /// 被分析的文件（第一个候选）
    pub fn primary(&self) -> Option<&CandidateFile> {
        self.candidate_files.first()
    }

    pub fn file_names(&self) -> Vec<String> {
        self.candidate_files.iter().map(|f| f.name.clone()).collect()
    }

    pub fn has_manifest(&self) -> bool {
        self.manifest_tree.is_some()
    }
}
