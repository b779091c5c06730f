//! Score-and-claim matching of input columns to canonical fields.
//!
//! Matching is deterministic: every (field, column) pair gets a numeric
//! score, fields claim columns in canonical order, and a claimed column is
//! never reconsidered. Scores carry a component breakdown so a mapping can
//! be explained back to the user.

use std::collections::{BTreeMap, BTreeSet};

use angio_model::RowTable;

use crate::fields::CanonicalField;

/// Exact alias hit.
const EXACT_SCORE: f32 = 100.0;
/// Ceiling for containment hits; scaled by the length ratio.
const CONTAINMENT_SCALE: f32 = 80.0;
/// A field only claims a column scoring strictly above this.
const MIN_CONFIDENCE: f32 = 50.0;

/// Score for a single column-field pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnScore {
    /// Confidence, 0–100.
    pub score: f32,
    /// Breakdown of score components for explainability.
    pub explanation: Vec<ScoreComponent>,
}

impl ColumnScore {
    fn zero() -> Self {
        Self {
            score: 0.0,
            explanation: Vec::new(),
        }
    }

    /// Human-readable explanation of the score.
    pub fn explain(&self) -> String {
        self.explanation
            .iter()
            .map(|c| format!("{}: {:.0}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A component contributing to the final score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreComponent {
    pub name: &'static str,
    pub value: f32,
    pub description: String,
}

/// A claimed column for a canonical field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldAssignment {
    /// Source column name as it appeared in the input.
    pub column: String,
    /// Index of the column in the input header row.
    pub column_index: usize,
    pub score: ColumnScore,
}

/// Result of mapping a header row.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    pub assignments: BTreeMap<CanonicalField, FieldAssignment>,
    /// Input columns no field claimed.
    pub unmapped_columns: Vec<String>,
}

impl ColumnMap {
    /// The claimed column index for a field, if any.
    pub fn column_index(&self, field: CanonicalField) -> Option<usize> {
        self.assignments.get(&field).map(|a| a.column_index)
    }

    pub fn column(&self, field: CanonicalField) -> Option<&str> {
        self.assignments.get(&field).map(|a| a.column.as_str())
    }

    pub fn is_mapped(&self, field: CanonicalField) -> bool {
        self.assignments.contains_key(&field)
    }

    /// Canonical names of `wanted` fields that failed to map.
    pub fn missing(&self, wanted: &[CanonicalField]) -> Vec<String> {
        wanted
            .iter()
            .filter(|f| !self.is_mapped(**f))
            .map(|f| f.name().to_string())
            .collect()
    }
}

/// Engine for mapping input columns to canonical fields.
#[derive(Debug, Clone)]
pub struct ColumnMatcher {
    min_confidence: f32,
}

impl Default for ColumnMatcher {
    fn default() -> Self {
        Self {
            min_confidence: MIN_CONFIDENCE,
        }
    }
}

impl ColumnMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the claim threshold (default 50).
    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// Score a single column against a field's alias table.
    pub fn score(&self, field: CanonicalField, column: &str) -> ColumnScore {
        let normalized = normalize(column);
        if normalized.is_empty() {
            return ColumnScore::zero();
        }

        let mut best = ColumnScore::zero();
        for alias in field.aliases() {
            let candidate = if normalized == *alias {
                ColumnScore {
                    score: EXACT_SCORE,
                    explanation: vec![ScoreComponent {
                        name: "Exact alias",
                        value: EXACT_SCORE,
                        description: format!("'{column}' == '{alias}'"),
                    }],
                }
            } else if normalized.contains(alias) || alias.contains(&normalized) {
                let shorter = alias.chars().count().min(normalized.chars().count());
                let longer = alias.chars().count().max(normalized.chars().count());
                let score = shorter as f32 / longer as f32 * CONTAINMENT_SCALE;
                ColumnScore {
                    score,
                    explanation: vec![ScoreComponent {
                        name: "Containment",
                        value: score,
                        description: format!("'{column}' ~ '{alias}'"),
                    }],
                }
            } else {
                continue;
            };

            if candidate.score > best.score {
                best = candidate;
            }
            if best.score >= EXACT_SCORE {
                break;
            }
        }
        best
    }

    /// Map a header row to canonical fields.
    ///
    /// Fields claim in [`CanonicalField::ALL`] order; each column is consumed
    /// by at most one field. When two columns tie for a field, the leftmost
    /// wins.
    pub fn map_columns(&self, columns: &[String]) -> ColumnMap {
        let mut claimed: BTreeSet<usize> = BTreeSet::new();
        let mut assignments = BTreeMap::new();

        for field in CanonicalField::ALL {
            let mut best: Option<(usize, ColumnScore)> = None;
            for (idx, column) in columns.iter().enumerate() {
                if claimed.contains(&idx) {
                    continue;
                }
                let score = self.score(field, column);
                let better = match &best {
                    Some((_, current)) => score.score > current.score,
                    None => score.score > 0.0,
                };
                if better {
                    best = Some((idx, score));
                }
            }

            if let Some((idx, score)) = best
                && score.score > self.min_confidence
            {
                claimed.insert(idx);
                assignments.insert(
                    field,
                    FieldAssignment {
                        column: columns[idx].clone(),
                        column_index: idx,
                        score,
                    },
                );
            }
        }

        let unmapped_columns = columns
            .iter()
            .enumerate()
            .filter(|(idx, _)| !claimed.contains(idx))
            .map(|(_, c)| c.clone())
            .collect();

        ColumnMap {
            assignments,
            unmapped_columns,
        }
    }

    /// Convenience wrapper over a table's header row.
    pub fn map_table(&self, table: &RowTable) -> ColumnMap {
        self.map_columns(&table.headers)
    }
}

/// Normalize a column name for comparison: trim, lowercase, collapse
/// whitespace runs to single spaces.
fn normalize(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
