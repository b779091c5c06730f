//! Left-join of score records onto the original input rows.
//!
//! The appended column names are part of the external contract and must stay
//! stable; downstream statistics code selects on them by name.

use std::collections::BTreeMap;

use angio_model::RowTable;

use crate::pipeline::PatientScores;

/// Appended columns, in output order.
pub const SCORE_COLUMNS: [&str; 7] = [
    "SYNTAX_score",
    "SYNTAX_class",
    "SYNTAX_II_score",
    "CAD_RADS_grade",
    "CAD_RADS_risk",
    "Gensini_score",
    "Gensini_class",
];

/// Append score columns to `table`, joining on the identifier column.
///
/// Rows whose identifier has no score record keep blank score cells; rows
/// are never dropped or reordered.
pub fn merge_scores(
    table: &RowTable,
    id_column: usize,
    scores: &[PatientScores],
) -> RowTable {
    let by_id: BTreeMap<&str, &PatientScores> = scores
        .iter()
        .map(|s| (s.patient_id.as_str(), s))
        .collect();

    let mut headers = table.headers.clone();
    headers.extend(SCORE_COLUMNS.iter().map(|c| (*c).to_string()));

    let mut merged = RowTable::new(headers);
    for (row_idx, row) in table.rows.iter().enumerate() {
        let mut out = row.clone();
        match table.cell(row_idx, id_column).and_then(|id| by_id.get(id)) {
            Some(scores) => out.extend(score_cells(scores)),
            None => out.extend(std::iter::repeat_n(String::new(), SCORE_COLUMNS.len())),
        }
        merged.push_row(out);
    }
    merged
}

fn score_cells(scores: &PatientScores) -> Vec<String> {
    vec![
        format_number(scores.syntax.total),
        scores.syntax.risk.to_string(),
        format_number(scores.syntax.syntax_ii),
        scores.cadrads.grade.to_string(),
        scores.cadrads.risk.to_string(),
        format_number(scores.gensini.total),
        scores.gensini.severity.to_string(),
    ]
}

/// Format a score without trailing zeros ("7.50" -> "7.5", "8.0" -> "8").
pub fn format_number(value: f64) -> String {
    let s = format!("{value:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
