//! 压缩包解包服务 - 业务能力层
//!
//! 只负责"从压缩包里找出清单和候选评估文件"，不做分析

use crate::error::{AnalysisError, AnalysisResult};
use crate::models::{CandidateFile, PackageBundle, XmlNode};
use crate::services::document_parser::{parse_document, ParseOptions};
use std::io::{Cursor, Read};
use tracing::{debug, info, warn};
use zip::result::ZipResult;
use zip::ZipArchive;

/// 清单文件的约定路径（压缩包根目录）
pub const MANIFEST_PATH: &str = "imsmanifest.xml";

/// QTI 根元素特征
const QTI_ROOT_FINGERPRINTS: &[&str] = &[
    "<questestinterop",
    "<assessmentTest",
    "<assessmentItem",
    ":questestinterop",
    ":assessmentTest",
    ":assessmentItem",
];

/// 解包
///
/// 候选文件保持压缩包枚举顺序；没有任何候选文件时返回 `EmptyPackage`
pub fn extract_package(bytes: &[u8], options: &ParseOptions) -> AnalysisResult<PackageBundle> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let entry_count = archive.len();
    debug!("压缩包共 {} 个条目", entry_count);

    let mut manifest_tree = None;
    let mut candidate_files = Vec::new();

    for index in 0..entry_count {
        // 先按名字过滤，不相关的条目不解压
        let Some(name) = archive.name_for_index(index).map(str::to_string) else {
            continue;
        };
        if name.ends_with('/') {
            continue;
        }
        let manifest = is_manifest(&name);
        if !manifest && !has_markup_extension(&name) {
            continue;
        }

        let raw_text = match read_entry(&mut archive, index) {
            Ok(text) => text,
            Err(e) => {
                warn!("⚠️ 无法读取条目 {}，已跳过: {}", name, e);
                continue;
            }
        };

        if manifest {
            manifest_tree = parse_manifest(&raw_text, options);
            continue;
        }

        if looks_like_qti(&raw_text) {
            debug!("✓ 候选文件: {}", name);
            candidate_files.push(CandidateFile { name, raw_text });
        } else {
            debug!("跳过非 QTI 文件: {}", name);
        }
    }

    if candidate_files.is_empty() {
        warn!("⚠️ 压缩包中没有 QTI 文件 (共 {} 个条目)", entry_count);
        return Err(AnalysisError::EmptyPackage { entry_count });
    }

    info!(
        "📦 找到 {} 个 QTI 文件，清单: {}",
        candidate_files.len(),
        if manifest_tree.is_some() { "有" } else { "无" }
    );

    Ok(PackageBundle {
        manifest_tree,
        candidate_files,
        entry_count,
    })
}

/// 读取单个条目（校验和错误、加密、不支持的压缩方式都会在这里报错）
fn read_entry(archive: &mut ZipArchive<Cursor<&[u8]>>, index: usize) -> ZipResult<String> {
    let mut entry = archive.by_index(index)?;
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// 清单只做尽力解析，格式错误时视为没有清单
fn parse_manifest(raw: &str, options: &ParseOptions) -> Option<XmlNode> {
    let doc = parse_document(raw, options);
    if doc.well_formed {
        Some(doc.tree)
    } else {
        warn!("⚠️ {} 格式错误，忽略清单: {:?}", MANIFEST_PATH, doc.parse_errors);
        None
    }
}

fn is_manifest(name: &str) -> bool {
    name.eq_ignore_ascii_case(MANIFEST_PATH)
}

fn has_markup_extension(name: &str) -> bool {
    std::path::Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("xml"))
        .unwrap_or(false)
}

/// 内容中是否包含 QTI 根元素特征
pub fn looks_like_qti(raw: &str) -> bool {
    QTI_ROOT_FINGERPRINTS.iter().any(|fp| raw.contains(fp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_candidates_keep_archive_order() {
        let bytes = build_zip(&[
            ("imsmanifest.xml", "<manifest><resources/></manifest>"),
            ("b/quiz.xml", "<questestinterop/>"),
            ("a/item.xml", "<assessmentItem identifier=\"x\"/>"),
            ("assessment_meta.xml", "<quiz/>"),
            ("image.png", "not xml"),
        ]);

        let bundle = extract_package(&bytes, &ParseOptions::default()).unwrap();
        assert_eq!(bundle.file_names(), vec!["b/quiz.xml", "a/item.xml"]);
        assert_eq!(bundle.primary().unwrap().name, "b/quiz.xml");
        assert!(bundle.has_manifest());
        assert_eq!(bundle.entry_count, 5);
    }

    #[test]
    fn test_malformed_manifest_is_not_fatal() {
        let bytes = build_zip(&[
            ("imsmanifest.xml", "<manifest><resources></manifest>"),
            ("quiz.XML", "<questestinterop/>"),
        ]);

        let bundle = extract_package(&bytes, &ParseOptions::default()).unwrap();
        assert!(!bundle.has_manifest());
        assert_eq!(bundle.candidate_files.len(), 1);
    }

    /// 以不压缩方式写入，并把 `marker` 在条目数据中的第一个字节改掉，使校验和失效
    fn build_corrupted_zip(entries: &[(&str, &str)], marker: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let stored = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, content) in entries {
            writer.start_file(*name, stored).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        let mut bytes = writer.finish().unwrap().into_inner();

        let offset = bytes
            .windows(marker.len())
            .position(|w| w == marker.as_bytes())
            .unwrap();
        bytes[offset] ^= 0x20;
        bytes
    }

    #[test]
    fn test_unreadable_manifest_is_not_fatal() {
        let bytes = build_corrupted_zip(
            &[
                ("imsmanifest.xml", "<manifest identifier=\"BROKEN-CRC\"/>"),
                ("quiz.xml", "<questestinterop><item ident=\"q1\"/></questestinterop>"),
            ],
            "BROKEN-CRC",
        );

        let bundle = extract_package(&bytes, &ParseOptions::default()).unwrap();
        assert!(!bundle.has_manifest());
        assert_eq!(bundle.file_names(), vec!["quiz.xml"]);
    }

    #[test]
    fn test_unreadable_entry_is_skipped() {
        let bytes = build_corrupted_zip(
            &[
                ("notes/extra.xml", "<assessmentItem identifier=\"BROKEN-CRC\"/>"),
                ("quiz.xml", "<questestinterop><item ident=\"q1\"/></questestinterop>"),
            ],
            "BROKEN-CRC",
        );

        let bundle = extract_package(&bytes, &ParseOptions::default()).unwrap();
        assert_eq!(bundle.file_names(), vec!["quiz.xml"]);
        assert_eq!(bundle.entry_count, 2);
    }

    #[test]
    fn test_no_candidates_is_empty_package() {
        let bytes = build_zip(&[("readme.txt", "hello"), ("meta.xml", "<quiz/>")]);
        let err = extract_package(&bytes, &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyPackage { entry_count: 2 }));
    }

    #[test]
    fn test_not_an_archive() {
        let err = extract_package(b"definitely not a zip", &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidArchive { .. }));
    }

    #[test]
    fn test_looks_like_qti_with_prefix() {
        assert!(looks_like_qti("<imsqti:assessmentTest/>"));
        assert!(!looks_like_qti("<manifest/>"));
    }
}
