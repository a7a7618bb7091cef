pub mod classifier;
pub mod content_scanner;
pub mod document_parser;
pub mod package_extractor;
pub mod question_extractor;
pub mod scorer;
pub mod validator;

pub use classifier::{interaction_breakdown, support_for};
pub use content_scanner::scan_content;
pub use document_parser::{parse_document, try_parse_document, ParseOptions};
pub use package_extractor::extract_package;
pub use question_extractor::{extract_questions, ExtractOptions};
pub use scorer::{
    assess_compatibility, compute_score, note_structure_errors, FIX_STRUCTURE, READY_FOR_IMPORT,
};
pub use validator::validate_structure;
