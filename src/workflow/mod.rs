pub mod analysis_ctx;
pub mod analysis_flow;
pub mod report_assembler;

pub use analysis_ctx::{AnalysisCtx, InputKind};
pub use analysis_flow::{AnalyzeOptions, Analyzer};
pub use report_assembler::assemble_report;
