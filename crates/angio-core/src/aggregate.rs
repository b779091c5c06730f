//! Grouping of extracted rows into per-patient lesion collections.

use std::collections::BTreeMap;

use crate::extract::ExtractedRow;
use angio_model::Patient;

/// Group rows by patient identifier, preserving first-seen order.
///
/// The first row for an identifier fixes the patient's clinical attributes;
/// later rows contribute lesions only. No attribute merging or conflict
/// resolution is attempted across duplicate rows.
pub fn aggregate_patients(rows: Vec<ExtractedRow>) -> Vec<Patient> {
    let mut patients: Vec<Patient> = Vec::new();
    let mut index: BTreeMap<String, usize> = BTreeMap::new();

    for row in rows {
        let slot = match index.get(&row.attrs.patient_id) {
            Some(slot) => *slot,
            None => {
                index.insert(row.attrs.patient_id.clone(), patients.len());
                patients.push(row.attrs);
                patients.len() - 1
            }
        };
        for lesion in row.lesions {
            patients[slot].push_lesion(lesion);
        }
    }

    patients
}
