//! Row extraction for the accepted input shapes.
//!
//! Shape detection is structural: a table carrying any known segment column
//! is the wide layout; anything else goes through the long-format path,
//! which covers both one-row-per-patient and one-row-per-lesion tables
//! (grouping happens later in aggregation). The dual-table shape has its own
//! entry point because the lesion rows join a separate patients table.

use std::collections::BTreeMap;
use std::str::FromStr;

use thiserror::Error;

use angio_map::{CanonicalField, ColumnMap, ColumnMatcher};
use angio_model::{Gender, Lesion, LesionSite, Patient, RowTable, Vessel};
use angio_normalize::{
    GenderMap, detect_features, extract_stenosis_percent, match_site, match_vessel, parse_bool,
    parse_number, segment_column,
};

use crate::batch::{BatchLog, IssueKind};

/// Age assumed when the age cell is blank or unparseable.
const DEFAULT_AGE: u32 = 65;
/// Representative length for lesions described as diffuse in free text,
/// chosen to clear the 20 mm diffuse-disease threshold.
const DIFFUSE_TEXT_LENGTH_MM: f64 = 25.0;

/// Table-level extraction failure; aborts this table only.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Normalization knobs supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct NormalizerOptions {
    /// Gender token overrides layered over the built-in table.
    pub gender_map: GenderMap,
    /// Keep 0% wide-layout cells as lesions (they never add to any score).
    pub include_zero_stenosis: bool,
}

/// Parse a gender override map from external JSON
/// (`{"0": "female", "1": "male"}`).
pub fn gender_overrides_from_json(json: &str) -> anyhow::Result<GenderMap> {
    let raw: BTreeMap<String, String> = serde_json::from_str(json)?;
    let mut overrides = BTreeMap::new();
    for (token, gender) in raw {
        let gender = Gender::from_str(&gender).map_err(anyhow::Error::msg)?;
        overrides.insert(token, gender);
    }
    Ok(GenderMap::with_overrides(overrides))
}

/// One input row after normalization: patient attributes plus the lesions
/// the row contributed.
#[derive(Debug, Clone)]
pub struct ExtractedRow {
    /// Patient attributes; the lesion list is empty at this stage.
    pub attrs: Patient,
    pub lesions: Vec<Lesion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableShape {
    /// One column per named anatomical segment, free text per cell.
    Wide,
    /// Lesion fields in dedicated columns, one lesion per row.
    Long,
}

pub fn detect_shape(table: &RowTable) -> TableShape {
    if angio_normalize::has_segment_columns(&table.headers) {
        TableShape::Wide
    } else {
        TableShape::Long
    }
}

const PATIENT_REQUIRED: [CanonicalField; 3] = [
    CanonicalField::PatientId,
    CanonicalField::Age,
    CanonicalField::Gender,
];

const LONG_REQUIRED: [CanonicalField; 6] = [
    CanonicalField::PatientId,
    CanonicalField::Age,
    CanonicalField::Gender,
    CanonicalField::Vessel,
    CanonicalField::StenosisPercent,
    CanonicalField::Location,
];

const LESION_TABLE_REQUIRED: [CanonicalField; 4] = [
    CanonicalField::PatientId,
    CanonicalField::Vessel,
    CanonicalField::StenosisPercent,
    CanonicalField::Location,
];

/// Extract every row of a single-table input (wide or long layout).
///
/// Row-level failures are logged and skipped; only missing required columns
/// abort the table.
pub fn extract_table(
    source: &str,
    table: &RowTable,
    options: &NormalizerOptions,
    log: &mut BatchLog,
) -> Result<Vec<ExtractedRow>, ExtractError> {
    let shape = detect_shape(table);
    let colmap = ColumnMatcher::new().map_table(table);

    let required: &[CanonicalField] = match shape {
        TableShape::Wide => &PATIENT_REQUIRED,
        TableShape::Long => &LONG_REQUIRED,
    };
    let missing = colmap.missing(required);
    if !missing.is_empty() {
        return Err(ExtractError::MissingColumns(missing));
    }

    let mut extracted = Vec::new();
    for row in 0..table.len() {
        let Some(attrs) = patient_attrs(source, table, &colmap, options, row, log) else {
            continue;
        };
        let lesions = match shape {
            TableShape::Wide => wide_lesions(source, table, options, row, &attrs, log),
            TableShape::Long => long_lesions(source, table, &colmap, options, row, &attrs, log),
        };
        let Some(lesions) = lesions else {
            continue;
        };
        extracted.push(ExtractedRow { attrs, lesions });
    }
    Ok(extracted)
}

/// Extract the dual-table shape: patient attributes in one table, lesion
/// rows in another, joined on the patient identifier.
pub fn extract_dual_tables(
    source: &str,
    patients: &RowTable,
    lesions: &RowTable,
    options: &NormalizerOptions,
    log: &mut BatchLog,
) -> Result<Vec<ExtractedRow>, ExtractError> {
    let patient_map = ColumnMatcher::new().map_table(patients);
    let missing = patient_map.missing(&PATIENT_REQUIRED);
    if !missing.is_empty() {
        return Err(ExtractError::MissingColumns(missing));
    }
    let lesion_map = ColumnMatcher::new().map_table(lesions);
    let missing = lesion_map.missing(&LESION_TABLE_REQUIRED);
    if !missing.is_empty() {
        return Err(ExtractError::MissingColumns(missing));
    }

    let mut rows: Vec<ExtractedRow> = Vec::new();
    let mut index: BTreeMap<String, usize> = BTreeMap::new();
    for row in 0..patients.len() {
        let Some(attrs) = patient_attrs(source, patients, &patient_map, options, row, log) else {
            continue;
        };
        if index.contains_key(&attrs.patient_id) {
            // First row wins for attributes; duplicates add nothing here.
            continue;
        }
        index.insert(attrs.patient_id.clone(), rows.len());
        rows.push(ExtractedRow {
            attrs,
            lesions: Vec::new(),
        });
    }

    for row in 0..lesions.len() {
        let Some(patient_id) = cell(lesions, &lesion_map, CanonicalField::PatientId, row) else {
            log.push(
                source,
                Some(row),
                None,
                IssueKind::MissingIdentifier,
                "lesion row without patient identifier",
            );
            continue;
        };
        let Some(slot) = index.get(patient_id.as_str()) else {
            log.push(
                source,
                Some(row),
                Some(&patient_id),
                IssueKind::OrphanLesion,
                "lesion row references a patient absent from the patients table",
            );
            continue;
        };
        let attrs = rows[*slot].attrs.clone();
        if let Some(lesion) =
            lesion_from_columns(source, lesions, &lesion_map, options, row, &attrs, log)
        {
            rows[*slot].lesions.extend(lesion);
        }
    }

    Ok(rows)
}

/// Patient attributes from one row. `None` means the row was skipped (and
/// logged).
fn patient_attrs(
    source: &str,
    table: &RowTable,
    colmap: &ColumnMap,
    options: &NormalizerOptions,
    row: usize,
    log: &mut BatchLog,
) -> Option<Patient> {
    let Some(patient_id) = cell(table, colmap, CanonicalField::PatientId, row) else {
        log.push(
            source,
            Some(row),
            None,
            IssueKind::MissingIdentifier,
            "row without patient identifier",
        );
        return None;
    };

    let age = cell(table, colmap, CanonicalField::Age, row)
        .as_deref()
        .and_then(parse_number);
    let age = match age {
        Some(value) if (0.0..=150.0).contains(&value) => value.round() as u32,
        Some(value) => {
            log.push(
                source,
                Some(row),
                Some(&patient_id),
                IssueKind::OutOfRange,
                format!("age out of range: {value} (expected 0..=150)"),
            );
            return None;
        }
        None => DEFAULT_AGE,
    };

    let gender = match cell(table, colmap, CanonicalField::Gender, row) {
        Some(raw) => match options.gender_map.resolve(&raw) {
            Some(gender) => gender,
            None => {
                log.push(
                    source,
                    Some(row),
                    Some(&patient_id),
                    IssueKind::UnknownGender,
                    format!("unknown gender token '{raw}', defaulting to male"),
                );
                Gender::Male
            }
        },
        None => Gender::Male,
    };

    let mut patient = match Patient::new(patient_id.clone(), age, gender) {
        Ok(patient) => patient,
        Err(err) => {
            log.push(
                source,
                Some(row),
                Some(&patient_id),
                IssueKind::OutOfRange,
                err.to_string(),
            );
            return None;
        }
    };

    patient.diabetes = bool_cell(table, colmap, CanonicalField::Diabetes, row);
    patient.hypertension = bool_cell(table, colmap, CanonicalField::Hypertension, row);
    patient.hyperlipidemia = bool_cell(table, colmap, CanonicalField::Hyperlipidemia, row);
    patient.smoking = bool_cell(table, colmap, CanonicalField::Smoking, row);
    patient.family_history = bool_cell(table, colmap, CanonicalField::FamilyHistory, row);

    if let Some(ef) = numeric_cell(table, colmap, CanonicalField::EjectionFraction, row) {
        patient = match patient.with_ejection_fraction(ef) {
            Ok(patient) => patient,
            Err(err) => {
                log.push(
                    source,
                    Some(row),
                    Some(&patient_id),
                    IssueKind::OutOfRange,
                    err.to_string(),
                );
                return None;
            }
        };
    }
    if let Some(cr) = numeric_cell(table, colmap, CanonicalField::CreatinineMgDl, row) {
        patient = match patient.with_creatinine_mg_dl(cr) {
            Ok(patient) => patient,
            Err(err) => {
                log.push(
                    source,
                    Some(row),
                    Some(&patient_id),
                    IssueKind::OutOfRange,
                    err.to_string(),
                );
                return None;
            }
        };
    }

    Some(patient)
}

/// Lesions from the wide layout's segment columns. `None` skips the row.
fn wide_lesions(
    source: &str,
    table: &RowTable,
    options: &NormalizerOptions,
    row: usize,
    attrs: &Patient,
    log: &mut BatchLog,
) -> Option<Vec<Lesion>> {
    let mut lesions = Vec::new();
    for (column, header) in table.headers.iter().enumerate() {
        let Some((vessel, site)) = segment_column(header) else {
            continue;
        };
        let Some(text) = table.cell(row, column) else {
            continue;
        };
        let Some(stenosis) = extract_stenosis_percent(text) else {
            continue;
        };
        if stenosis == 0.0 && !options.include_zero_stenosis {
            continue;
        }

        let features = detect_features(text);
        let lesion = build_lesion(vessel, site, stenosis, &features);
        match lesion {
            Ok(lesion) => {
                check_cto_consistency(source, row, attrs, &lesion, log);
                lesions.push(lesion);
            }
            Err(err) => {
                log.push(
                    source,
                    Some(row),
                    Some(&attrs.patient_id),
                    IssueKind::OutOfRange,
                    format!("segment '{header}': {err}"),
                );
                return None;
            }
        }
    }
    Some(lesions)
}

fn build_lesion(
    vessel: Vessel,
    site: LesionSite,
    stenosis: f64,
    features: &angio_normalize::LesionFeatures,
) -> angio_model::Result<Lesion> {
    let mut lesion = Lesion::new(vessel, site, stenosis)?;
    lesion.is_bifurcation = features.bifurcation;
    lesion.is_calcified = features.calcified;
    lesion.thrombus_present = features.thrombus;
    lesion.is_tortuous = features.tortuous;
    lesion.is_ostial = features.ostial;
    lesion.is_cto = features.cto;
    if features.diffuse {
        lesion = lesion.with_length_mm(DIFFUSE_TEXT_LENGTH_MM)?;
    }
    Ok(lesion)
}

/// The single lesion a long-format row carries. `None` skips the row;
/// `Some(vec![])` keeps the row with no lesion.
fn long_lesions(
    source: &str,
    table: &RowTable,
    colmap: &ColumnMap,
    options: &NormalizerOptions,
    row: usize,
    attrs: &Patient,
    log: &mut BatchLog,
) -> Option<Vec<Lesion>> {
    lesion_from_columns(source, table, colmap, options, row, attrs, log)
}

fn lesion_from_columns(
    source: &str,
    table: &RowTable,
    colmap: &ColumnMap,
    options: &NormalizerOptions,
    row: usize,
    attrs: &Patient,
    log: &mut BatchLog,
) -> Option<Vec<Lesion>> {
    let stenosis = cell(table, colmap, CanonicalField::StenosisPercent, row)
        .as_deref()
        .and_then(parse_stenosis_cell);
    let Some(stenosis) = stenosis else {
        // Not a stenosis statement; the row contributes no lesion.
        return Some(Vec::new());
    };
    if stenosis == 0.0 && !options.include_zero_stenosis {
        return Some(Vec::new());
    }

    let vessel = match cell(table, colmap, CanonicalField::Vessel, row) {
        Some(raw) => match match_vessel(&raw) {
            Some(vessel) => vessel,
            None => {
                log.push(
                    source,
                    Some(row),
                    Some(&attrs.patient_id),
                    IssueKind::UnknownVessel,
                    format!("unknown vessel '{raw}', defaulting to LAD"),
                );
                Vessel::Lad
            }
        },
        None => Vessel::Lad,
    };

    let site = match cell(table, colmap, CanonicalField::Location, row) {
        Some(raw) => match match_site(&raw) {
            Some(site) => site,
            None => {
                log.push(
                    source,
                    Some(row),
                    Some(&attrs.patient_id),
                    IssueKind::UnknownSite,
                    format!("unknown lesion location '{raw}', defaulting to proximal"),
                );
                LesionSite::Proximal
            }
        },
        None => LesionSite::Proximal,
    };

    let mut lesion = match Lesion::new(vessel, site, stenosis) {
        Ok(lesion) => lesion,
        Err(err) => {
            log.push(
                source,
                Some(row),
                Some(&attrs.patient_id),
                IssueKind::OutOfRange,
                err.to_string(),
            );
            return None;
        }
    };

    lesion.is_bifurcation = bool_cell(table, colmap, CanonicalField::IsBifurcation, row);
    lesion.is_calcified = bool_cell(table, colmap, CanonicalField::IsCalcified, row);
    lesion.is_ostial = bool_cell(table, colmap, CanonicalField::IsOstial, row);
    lesion.is_tortuous = bool_cell(table, colmap, CanonicalField::IsTortuous, row);
    lesion.is_cto = bool_cell(table, colmap, CanonicalField::IsCto, row);
    lesion.thrombus_present = bool_cell(table, colmap, CanonicalField::ThrombusPresent, row);

    if let Some(length) = numeric_cell(table, colmap, CanonicalField::LengthMm, row) {
        lesion = match lesion.with_length_mm(length) {
            Ok(lesion) => lesion,
            Err(err) => {
                log.push(
                    source,
                    Some(row),
                    Some(&attrs.patient_id),
                    IssueKind::OutOfRange,
                    err.to_string(),
                );
                return None;
            }
        };
    }

    check_cto_consistency(source, row, attrs, &lesion, log);
    Some(vec![lesion])
}

fn check_cto_consistency(
    source: &str,
    row: usize,
    attrs: &Patient,
    lesion: &Lesion,
    log: &mut BatchLog,
) {
    if !lesion.cto_is_consistent() {
        log.push(
            source,
            Some(row),
            Some(&attrs.patient_id),
            IssueKind::CtoStenosisMismatch,
            format!(
                "lesion flagged CTO with stenosis {}%",
                lesion.stenosis_percent
            ),
        );
    }
}

/// Stenosis cell: plain numbers first ("75"), then the free-text rules.
fn parse_stenosis_cell(raw: &str) -> Option<f64> {
    if let Ok(value) = raw.trim().trim_end_matches(['%', '％']).trim().parse::<f64>() {
        return Some(value);
    }
    extract_stenosis_percent(raw)
}

fn cell(
    table: &RowTable,
    colmap: &ColumnMap,
    field: CanonicalField,
    row: usize,
) -> Option<String> {
    let column = colmap.column_index(field)?;
    table.cell(row, column).map(str::to_string)
}

fn bool_cell(table: &RowTable, colmap: &ColumnMap, field: CanonicalField, row: usize) -> bool {
    cell(table, colmap, field, row)
        .as_deref()
        .is_some_and(parse_bool)
}

fn numeric_cell(
    table: &RowTable,
    colmap: &ColumnMap,
    field: CanonicalField,
    row: usize,
) -> Option<f64> {
    cell(table, colmap, field, row).as_deref().and_then(parse_number)
}
