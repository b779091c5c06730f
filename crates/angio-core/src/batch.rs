//! Batch-level diagnostics.
//!
//! Every row skip, default fallback and table failure lands here with enough
//! context to find the offending cell. Nothing in the batch log ever aborts
//! processing; the caller decides what to surface.

use std::collections::BTreeMap;

use serde::Serialize;

/// Kind of diagnostic, used for summary counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingIdentifier,
    OutOfRange,
    UnknownVessel,
    UnknownSite,
    UnknownGender,
    CtoStenosisMismatch,
    OrphanLesion,
    MissingColumns,
    TableError,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::MissingIdentifier => "missing_identifier",
            IssueKind::OutOfRange => "out_of_range",
            IssueKind::UnknownVessel => "unknown_vessel",
            IssueKind::UnknownSite => "unknown_site",
            IssueKind::UnknownGender => "unknown_gender",
            IssueKind::CtoStenosisMismatch => "cto_stenosis_mismatch",
            IssueKind::OrphanLesion => "orphan_lesion",
            IssueKind::MissingColumns => "missing_columns",
            IssueKind::TableError => "table_error",
        }
    }

    /// Row-level issues skip a row; table-level issues fail the whole table.
    pub fn is_table_level(&self) -> bool {
        matches!(self, IssueKind::MissingColumns | IssueKind::TableError)
    }
}

/// One diagnostic event.
#[derive(Debug, Clone, Serialize)]
pub struct BatchIssue {
    /// Source table label (typically the file name).
    pub source: String,
    /// Zero-based data row index, when row-scoped.
    pub row: Option<usize>,
    pub patient_id: Option<String>,
    pub kind: IssueKind,
    pub message: String,
}

impl BatchIssue {
    fn render(&self) -> String {
        let mut parts = vec![self.source.clone()];
        if let Some(row) = self.row {
            parts.push(format!("row {row}"));
        }
        if let Some(patient_id) = &self.patient_id {
            parts.push(format!("patient {patient_id}"));
        }
        parts.push(self.message.clone());
        parts.join(" | ")
    }
}

/// Collector for a batch run.
#[derive(Debug, Default)]
pub struct BatchLog {
    issues: Vec<BatchIssue>,
}

impl BatchLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        source: &str,
        row: Option<usize>,
        patient_id: Option<&str>,
        kind: IssueKind,
        message: impl Into<String>,
    ) {
        let message = message.into();
        tracing::warn!(
            source,
            row,
            patient_id,
            kind = kind.as_str(),
            "{message}"
        );
        self.issues.push(BatchIssue {
            source: source.to_string(),
            row,
            patient_id: patient_id.map(str::to_string),
            kind,
            message,
        });
    }

    pub fn issues(&self) -> &[BatchIssue] {
        &self.issues
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Condensed view for the caller/UI: counts plus the first examples.
    pub fn summary(&self, example_limit: usize) -> BatchSummary {
        let mut by_kind = BTreeMap::new();
        for issue in &self.issues {
            *by_kind.entry(issue.kind.as_str().to_string()).or_insert(0) += 1;
        }
        BatchSummary {
            total: self.issues.len(),
            by_kind,
            examples: self
                .issues
                .iter()
                .take(example_limit)
                .map(BatchIssue::render)
                .collect(),
        }
    }
}

/// Serializable batch outcome summary.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub by_kind: BTreeMap<String, usize>,
    pub examples: Vec<String>,
}
