//! The scoring pipeline: extract, aggregate, score, merge.
//!
//! The three calculators are pure functions over an immutable patient
//! snapshot; they hold no mutable state and can run per patient in any
//! order. Failure isolation is per row (extraction) and per table (batch):
//! nothing short of caller misuse aborts a whole batch.

use anyhow::Context;
use serde::Serialize;

use angio_map::CanonicalField;
use angio_model::{CadRadsScore, GensiniScore, Patient, RowTable, SyntaxScore};
use angio_score::{
    CadRadsCalculator, CadRadsConfig, GensiniCalculator, GensiniWeights, SyntaxCalculator,
    SyntaxWeights,
};

use crate::aggregate::aggregate_patients;
use crate::batch::{BatchLog, IssueKind};
use crate::extract::{
    ExtractError, NormalizerOptions, extract_dual_tables, extract_table,
};
use crate::merge::merge_scores;

/// All three score records for one patient.
#[derive(Debug, Clone, Serialize)]
pub struct PatientScores {
    pub patient_id: String,
    pub syntax: SyntaxScore,
    pub gensini: GensiniScore,
    pub cadrads: CadRadsScore,
}

/// One successfully processed table.
#[derive(Debug, Clone)]
pub struct ScoredTable {
    pub source: String,
    /// Original rows with the score columns appended (left join).
    pub merged: RowTable,
    pub scores: Vec<PatientScores>,
}

/// Outcome of a multi-table batch.
#[derive(Debug)]
pub struct BatchResult {
    pub tables: Vec<ScoredTable>,
    pub log: BatchLog,
}

#[derive(Debug, Clone, Default)]
pub struct ScoringPipeline {
    syntax: SyntaxCalculator,
    gensini: GensiniCalculator,
    cadrads: CadRadsCalculator,
    options: NormalizerOptions,
}

impl ScoringPipeline {
    /// Pipeline with the canonical weight tables.
    pub fn new(options: NormalizerOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Pipeline with caller-injected weight tables (external JSON overrides).
    pub fn with_weights(
        options: NormalizerOptions,
        syntax: SyntaxWeights,
        gensini: GensiniWeights,
        cadrads: CadRadsConfig,
    ) -> Self {
        Self {
            syntax: SyntaxCalculator::new(syntax),
            gensini: GensiniCalculator::new(gensini),
            cadrads: CadRadsCalculator::new(cadrads),
            options,
        }
    }

    /// Run all three calculators over one patient snapshot.
    pub fn score_patient(&self, patient: &Patient) -> PatientScores {
        PatientScores {
            patient_id: patient.patient_id.clone(),
            syntax: self.syntax.score(patient),
            gensini: self.gensini.score(patient),
            cadrads: self.cadrads.score(patient),
        }
    }

    /// Process one single-table input (wide or long layout).
    pub fn process_table(
        &self,
        source: &str,
        table: &RowTable,
        log: &mut BatchLog,
    ) -> anyhow::Result<ScoredTable> {
        let rows = extract_table(source, table, &self.options, log)
            .with_context(|| format!("extracting {source}"))?;
        let patients = aggregate_patients(rows);
        let scores: Vec<PatientScores> =
            patients.iter().map(|p| self.score_patient(p)).collect();

        let id_column = identifier_column(table)
            .context("identifier column disappeared after extraction")?;
        tracing::debug!(
            source,
            patients = patients.len(),
            scores = scores.len(),
            "table scored"
        );
        Ok(ScoredTable {
            source: source.to_string(),
            merged: merge_scores(table, id_column, &scores),
            scores,
        })
    }

    /// Process the dual-table shape; scores merge onto the patients table.
    pub fn process_dual_tables(
        &self,
        source: &str,
        patients: &RowTable,
        lesions: &RowTable,
        log: &mut BatchLog,
    ) -> anyhow::Result<ScoredTable> {
        let rows = extract_dual_tables(source, patients, lesions, &self.options, log)
            .with_context(|| format!("extracting {source}"))?;
        let grouped = aggregate_patients(rows);
        let scores: Vec<PatientScores> =
            grouped.iter().map(|p| self.score_patient(p)).collect();

        let id_column = identifier_column(patients)
            .context("identifier column disappeared after extraction")?;
        Ok(ScoredTable {
            source: source.to_string(),
            merged: merge_scores(patients, id_column, &scores),
            scores,
        })
    }

    /// Process a batch of named tables. A failing table is recorded in the
    /// log and the batch continues; the result carries every table that
    /// succeeded.
    pub fn process_batch(&self, tables: &[(String, RowTable)]) -> BatchResult {
        let mut log = BatchLog::new();
        let mut outputs = Vec::new();

        for (source, table) in tables {
            match self.process_table(source, table, &mut log) {
                Ok(scored) => outputs.push(scored),
                Err(err) => {
                    let kind = match err.downcast_ref::<ExtractError>() {
                        Some(ExtractError::MissingColumns(_)) => IssueKind::MissingColumns,
                        None => IssueKind::TableError,
                    };
                    log.push(source, None, None, kind, format!("{err:#}"));
                }
            }
        }

        BatchResult {
            tables: outputs,
            log,
        }
    }
}

/// The column holding the patient identifier in the original table.
fn identifier_column(table: &RowTable) -> Option<usize> {
    angio_map::ColumnMatcher::new()
        .map_table(table)
        .column_index(CanonicalField::PatientId)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesion_table(rows: &[[&str; 6]]) -> RowTable {
        let mut table = RowTable::new(
            ["patient_id", "age", "gender", "vessel", "stenosis_percent", "location"]
                .map(String::from)
                .to_vec(),
        );
        for row in rows {
            table.push_row(row.map(String::from).to_vec());
        }
        table
    }

    #[test]
    fn process_table_scores_and_merges() {
        let table = lesion_table(&[
            ["P001", "63", "male", "LAD", "75", "proximal"],
            ["P001", "63", "male", "RCA", "90", "mid"],
            ["P002", "58", "female", "LM", "80", "proximal"],
        ]);
        let pipeline = ScoringPipeline::default();
        let mut log = BatchLog::new();
        let scored = pipeline.process_table("a.csv", &table, &mut log).unwrap();

        assert_eq!(scored.scores.len(), 2);
        // P001: LAD 5.25 + RCA 3.5*0.7*2.0 = 4.9 -> 10.15.
        let p1 = &scored.scores[0];
        assert_eq!(p1.patient_id, "P001");
        assert!((p1.syntax.total - 10.15).abs() < 1e-9);
        // Both of P001's rows carry the same merged score cells.
        assert_eq!(scored.merged.cell_by_header(0, "SYNTAX_score"), Some("10.15"));
        assert_eq!(scored.merged.cell_by_header(1, "SYNTAX_score"), Some("10.15"));
        assert_eq!(scored.merged.cell_by_header(2, "SYNTAX_score"), Some("7.5"));
    }

    #[test]
    fn score_patient_is_reusable_and_pure() {
        let mut patient = Patient::new("P9", 70, angio_model::Gender::Male).unwrap();
        patient.push_lesion(
            angio_model::Lesion::new(
                angio_model::Vessel::Lcx,
                angio_model::LesionSite::Mid,
                85.0,
            )
            .unwrap(),
        );
        let pipeline = ScoringPipeline::default();
        let first = pipeline.score_patient(&patient);
        let second = pipeline.score_patient(&patient);
        assert_eq!(first.syntax, second.syntax);
        assert_eq!(first.gensini, second.gensini);
        assert_eq!(first.cadrads, second.cadrads);
    }

    #[test]
    fn batch_continues_past_failing_table() {
        let good = lesion_table(&[["P001", "63", "male", "LAD", "75", "proximal"]]);
        let bad = RowTable::new(vec!["nothing_useful".into()]);
        let pipeline = ScoringPipeline::default();
        let result = pipeline.process_batch(&[
            ("good.csv".to_string(), good),
            ("bad.csv".to_string(), bad.clone()),
            ("good2.csv".to_string(), lesion_table(&[[
                "P002", "58", "female", "LM", "80", "proximal",
            ]])),
        ]);

        assert_eq!(result.tables.len(), 2);
        let summary = result.log.summary(8);
        assert_eq!(summary.by_kind["missing_columns"], 1);
        assert!(summary.examples.iter().any(|e| e.contains("bad.csv")));
    }
}
