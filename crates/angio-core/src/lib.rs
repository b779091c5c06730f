pub mod aggregate;
pub mod batch;
pub mod extract;
pub mod merge;
pub mod pipeline;

pub use aggregate::aggregate_patients;
pub use batch::{BatchIssue, BatchLog, BatchSummary, IssueKind};
pub use extract::{
    ExtractError, ExtractedRow, NormalizerOptions, TableShape, detect_shape,
    extract_dual_tables, extract_table, gender_overrides_from_json,
};
pub use merge::{SCORE_COLUMNS, merge_scores};
pub use pipeline::{BatchResult, PatientScores, ScoredTable, ScoringPipeline};
