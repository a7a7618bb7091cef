pub mod document;
pub mod package;
pub mod question;
pub mod report;
pub mod support;

pub use document::{ChildGroup, ParsedDocument, SchemaVersion, XmlNode, XmlValue};
pub use package::{CandidateFile, PackageBundle};
pub use question::Question;
pub use report::{
    CompatibilityAssessment, CompatibilityReport, ContentFlags, Finding, FindingCategory,
    InteractionStat, PackageInfo, QuestionSummary, ReportMetadata, ScoringSummary, Severity,
    ValidationResult,
};
pub use support::InteractionSupport;
