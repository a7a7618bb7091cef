//! 结构校验服务 - 业务能力层
//!
//! 只检查根元素形状，不做 XSD 校验。
//! 缺少根元素只记一条错误，不中断后续分析。

use crate::models::{ParsedDocument, SchemaVersion, ValidationResult};

const LEGACY_ROOT: &str = "questestinterop";
const MODERN_TEST_ROOT: &str = "assessmentTest";
const MODERN_ITEM_ROOT: &str = "assessmentItem";

/// 校验文档结构
pub fn validate_structure(doc: &ParsedDocument) -> ValidationResult {
    if !doc.well_formed {
        return ValidationResult {
            valid: false,
            errors: doc.parse_errors.clone(),
            warnings: Vec::new(),
        };
    }

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let root = &doc.tree;

    match doc.schema_version {
        SchemaVersion::V1_2 => {
            if root.name != LEGACY_ROOT {
                errors.push(format!(
                    "QTI 1.2 document is missing the <{}> root element (found <{}>)",
                    LEGACY_ROOT, root.name
                ));
            } else if !root.has_child("assessment") && !root.has_child("item") {
                warnings.push("No <assessment> or <item> elements found under <questestinterop>".to_string());
            }
        }
        SchemaVersion::V2_1 => {
            if root.name == MODERN_TEST_ROOT {
                if !root.has_child("testPart") {
                    warnings.push("<assessmentTest> has no <testPart> elements".to_string());
                }
            } else if root.name == MODERN_ITEM_ROOT {
                if !root.has_child("itemBody") {
                    warnings.push("<assessmentItem> has no <itemBody>".to_string());
                }
            } else {
                errors.push(format!(
                    "QTI 2.1 document must have an <{}> or <{}> root element (found <{}>)",
                    MODERN_TEST_ROOT, MODERN_ITEM_ROOT, root.name
                ));
            }

            if errors.is_empty() && !has_qti2_namespace(doc) {
                warnings.push("No QTI 2.x namespace declaration on the root element".to_string());
            }
        }
    }

    ValidationResult {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

fn has_qti2_namespace(doc: &ParsedDocument) -> bool {
    doc.tree
        .attributes
        .iter()
        .any(|(key, value)| key.starts_with("xmlns") && value.contains("imsqti_v2"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::document_parser::{parse_document, ParseOptions};

    fn validate(raw: &str) -> ValidationResult {
        validate_structure(&parse_document(raw, &ParseOptions::default()))
    }

    #[test]
    fn test_valid_legacy() {
        let result = validate("<questestinterop><assessment title=\"Quiz\"/></questestinterop>");
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_legacy_fingerprint_wrong_root() {
        let result = validate(r#"<quiz xmlns="http://www.imsglobal.org/xsd/ims_qtiasiv1p2"/>"#);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn test_modern_roots() {
        let ns = "http://www.imsglobal.org/xsd/imsqti_v2p1";
        let result = validate(&format!(r#"<assessmentTest xmlns="{}"><testPart/></assessmentTest>"#, ns));
        assert!(result.valid);
        assert!(result.warnings.is_empty());

        let result = validate(r#"<assessmentItem identifier="a"/>"#);
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn test_unknown_root_is_single_error() {
        let result = validate("<quiz><question/></quiz>");
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("<quiz>"));
    }

    #[test]
    fn test_malformed_reports_parse_errors() {
        let result = validate("<a><b></a>");
        assert!(!result.valid);
        assert!(!result.errors.is_empty());
    }
}
